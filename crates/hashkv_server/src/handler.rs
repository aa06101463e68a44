//! Request handling for the entry endpoints.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::response::Response;
use crate::route::{Method, Route};
use hashkv_core::Manager;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Body returned when a key is not an integer.
pub const INVALID_KEY_MESSAGE: &str = "Invalid key parameter; must be integer";

/// Count of handled requests per status code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestStats {
    /// Total requests handled.
    pub total: u64,
    /// Requests per response status.
    pub by_status: BTreeMap<u16, u64>,
}

/// Context for request handling.
pub struct HandlerContext {
    /// Server configuration.
    pub config: ServerConfig,
    /// The store (shared across all handlers).
    pub manager: Arc<Manager>,
    stats: RwLock<RequestStats>,
}

impl HandlerContext {
    /// Creates a new handler context.
    pub fn new(config: ServerConfig, manager: Arc<Manager>) -> Self {
        Self {
            config,
            manager,
            stats: RwLock::new(RequestStats::default()),
        }
    }

    fn record(&self, status: u16) {
        let mut stats = self.stats.write();
        stats.total += 1;
        *stats.by_status.entry(status).or_insert(0) += 1;
    }

    /// Returns a copy of the request counters.
    pub fn stats(&self) -> RequestStats {
        self.stats.read().clone()
    }
}

/// Handler mapping requests onto manager operations.
pub struct RequestHandler {
    context: Arc<HandlerContext>,
}

impl RequestHandler {
    /// Creates a new request handler.
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }

    /// Handles one request. Never fails; errors become error responses.
    pub fn handle(&self, method: &str, path: &str, body: &[u8]) -> Response {
        let response = self
            .dispatch(&Method::parse(method), path, body)
            .unwrap_or_else(|err| {
                if err.is_server_error() {
                    warn!(method, path, error = %err, "request failed");
                }
                Response::from(err)
            });

        debug!(method, path, status = response.status, "request handled");
        self.context.record(response.status);
        response
    }

    fn dispatch(&self, method: &Method, path: &str, body: &[u8]) -> ServerResult<Response> {
        let route = Route::parse(path).ok_or_else(|| ServerError::NotFound(path.to_string()))?;
        if !route.allows(method) {
            return Err(ServerError::MethodNotAllowed {
                method: method.to_string(),
                path: path.to_string(),
            });
        }

        let manager = &self.context.manager;
        match (method, route) {
            (_, Route::Index) => Ok(Response::ok(self.context.config.banner.clone())),
            (_, Route::Entries) => {
                let entries = manager.list_all_entries()?;
                Ok(Response::ok(entries.join(", ")))
            }
            (_, Route::Range(start, end)) => {
                let (start, end) = (parse_key(&start)?, parse_key(&end)?);
                let entries = manager.range_query(start, end)?;
                if entries.is_empty() {
                    Ok(Response::not_found())
                } else {
                    Ok(Response::ok(entries.join(", ")))
                }
            }
            (Method::Post, Route::Entry(key)) => {
                let key = parse_key(&key)?;
                let value = self.body_text(body)?;
                Ok(Response::from_operation(manager.insert(key, value)))
            }
            (Method::Delete, Route::Entry(key)) => {
                let key = parse_key(&key)?;
                Ok(Response::from_operation(manager.delete(key)))
            }
            (_, Route::Entry(key)) => {
                let key = parse_key(&key)?;
                Ok(Response::from_operation(manager.search(key)))
            }
        }
    }

    fn body_text(&self, body: &[u8]) -> ServerResult<String> {
        let max = self.context.config.max_body_bytes;
        if body.len() > max {
            return Err(ServerError::PayloadTooLarge {
                size: body.len(),
                max,
            });
        }
        String::from_utf8(body.to_vec())
            .map_err(|_| ServerError::InvalidRequest("Request body must be UTF-8 text".into()))
    }
}

fn parse_key(raw: &str) -> ServerResult<i64> {
    raw.parse()
        .map_err(|_| ServerError::InvalidRequest(INVALID_KEY_MESSAGE.to_string()))
}
