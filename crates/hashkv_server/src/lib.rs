//! # HashKV Server
//!
//! HTTP boundary for HashKV, independent of any transport.
//!
//! This crate provides:
//! - Path routing for the entry endpoints
//! - Mapping of store outcomes to status codes
//! - Request counters
//!
//! # Endpoints
//!
//! | Method | Path | Operation |
//! |---|---|---|
//! | `GET` | `/` | banner |
//! | `POST` | `/entries/{key}` | insert, body is the value |
//! | `DELETE` | `/entries/{key}` | delete |
//! | `GET` | `/entries/{key}` | search |
//! | `GET` | `/entries/range/{start}/{end}` | range query, 404 when empty |
//! | `GET` | `/entries` | list every bucket |
//!
//! Successful operations answer 200. A refused operation (duplicate key,
//! missing key, bad key) answers 400 and a storage failure answers 503.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod error;
mod handler;
mod response;
mod route;
mod server;

pub use config::{ServerConfig, DEFAULT_BANNER, DEFAULT_MAX_BODY_BYTES};
pub use error::{ServerError, ServerResult};
pub use handler::{HandlerContext, RequestHandler, RequestStats, INVALID_KEY_MESSAGE};
pub use response::Response;
pub use route::{Method, Route};
pub use server::KvServer;
