//! Request routing.

use std::fmt;

/// HTTP methods the handler distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
    /// Anything else, kept for error messages.
    Other(String),
}

impl Method {
    /// Parses a method name, case-insensitively.
    pub fn parse(method: &str) -> Self {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "DELETE" => Method::Delete,
            other => Method::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
            Method::Delete => f.write_str("DELETE"),
            Method::Other(name) => f.write_str(name),
        }
    }
}

/// A matched path. Path parameters are raw; the handler validates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Index,
    /// `/entries`
    Entries,
    /// `/entries/{key}`
    Entry(String),
    /// `/entries/range/{start}/{end}`
    Range(String, String),
}

impl Route {
    /// Matches a request path. Query strings and a trailing slash are
    /// ignored.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split_once('?').map_or(path, |(p, _)| p);
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(Route::Index),
            ["entries"] => Some(Route::Entries),
            ["entries", "range", start, end] => {
                Some(Route::Range((*start).to_string(), (*end).to_string()))
            }
            ["entries", key] => Some(Route::Entry((*key).to_string())),
            _ => None,
        }
    }

    /// Returns true if the route accepts `method`.
    pub fn allows(&self, method: &Method) -> bool {
        match self {
            Route::Index | Route::Entries | Route::Range(..) => *method == Method::Get,
            Route::Entry(_) => matches!(method, Method::Get | Method::Post | Method::Delete),
        }
    }
}
