//! Server configuration.

/// Default maximum request body size (64 KiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Text served on `GET /`.
pub const DEFAULT_BANNER: &str = "HashKV Web Server";

/// Configuration for the request handler.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
    /// Text returned by the index route.
    pub banner: String,
}

impl ServerConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            banner: DEFAULT_BANNER.to_string(),
        }
    }

    /// Sets the maximum body size.
    pub fn with_max_body_bytes(mut self, max: usize) -> Self {
        self.max_body_bytes = max;
        self
    }

    /// Sets the index banner.
    pub fn with_banner(mut self, banner: impl Into<String>) -> Self {
        self.banner = banner.into();
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}
