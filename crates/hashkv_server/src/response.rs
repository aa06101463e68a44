//! Handler responses.

use crate::error::ServerError;
use hashkv_core::OperationResult;

/// A response: status code and plain-text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Plain-text body.
    pub body: String,
}

impl Response {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `200 OK` with a body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// `404 Not Found` with an empty body.
    pub fn not_found() -> Self {
        Self::new(404, "")
    }

    /// Maps an operation result: success is 200, a storage failure is 503,
    /// any other failure is 400. The body is the result message.
    pub fn from_operation(result: OperationResult) -> Self {
        let status = if result.succeeded {
            200
        } else if result.is_storage_failure() {
            503
        } else {
            400
        };
        Self::new(status, result.message)
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl From<ServerError> for Response {
    fn from(err: ServerError) -> Self {
        Self::new(err.status(), err.to_string())
    }
}
