//! Error types for the request handler.

use hashkv_core::CoreError;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that end a request with a non-2xx status.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Malformed request (bad key, bad body, range too wide).
    #[error("{0}")]
    InvalidRequest(String),

    /// No route matches the path.
    #[error("no route for {0}")]
    NotFound(String),

    /// The path exists but not for this method.
    #[error("method {method} not allowed for {path}")]
    MethodNotAllowed {
        /// Request method.
        method: String,
        /// Request path.
        path: String,
    },

    /// Request body over the configured limit.
    #[error("request body of {size} bytes exceeds limit of {max} bytes")]
    PayloadTooLarge {
        /// Body size.
        size: usize,
        /// Configured limit.
        max: usize,
    },

    /// The store cannot reach its storage.
    #[error("{0}")]
    Unavailable(String),
}

impl ServerError {
    /// Returns true if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServerError::InvalidRequest(_)
                | ServerError::NotFound(_)
                | ServerError::MethodNotAllowed { .. }
                | ServerError::PayloadTooLarge { .. }
        )
    }

    /// Returns true if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        matches!(self, ServerError::Unavailable(_))
    }

    /// Returns the HTTP status code for this error.
    pub fn status(&self) -> u16 {
        match self {
            ServerError::InvalidRequest(_) => 400,
            ServerError::NotFound(_) => 404,
            ServerError::MethodNotAllowed { .. } => 405,
            ServerError::PayloadTooLarge { .. } => 413,
            ServerError::Unavailable(_) => 503,
        }
    }
}

impl From<CoreError> for ServerError {
    fn from(err: CoreError) -> Self {
        if err.is_storage_failure() {
            ServerError::Unavailable(err.to_string())
        } else {
            ServerError::InvalidRequest(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_classification() {
        assert!(ServerError::InvalidRequest("bad".into()).is_client_error());
        assert!(ServerError::Unavailable("down".into()).is_server_error());
        assert!(!ServerError::InvalidRequest("bad".into()).is_server_error());
        assert!(!ServerError::Unavailable("down".into()).is_client_error());
    }

    #[test]
    fn status_codes() {
        assert_eq!(ServerError::NotFound("/x".into()).status(), 404);
        assert_eq!(
            ServerError::MethodNotAllowed {
                method: "PUT".into(),
                path: "/entries/1".into()
            }
            .status(),
            405
        );
        assert_eq!(ServerError::PayloadTooLarge { size: 9, max: 8 }.status(), 413);
    }

    #[test]
    fn core_errors_map_by_kind() {
        let wide = CoreError::RangeTooWide {
            low: 0,
            high: 10,
            max_span: 5,
        };
        assert_eq!(ServerError::from(wide).status(), 400);

        let down = CoreError::storage_unavailable(2, "mirror pull failed");
        let err = ServerError::from(down);
        assert_eq!(err.status(), 503);
        assert!(err.to_string().contains("bucket 2"));
    }
}
