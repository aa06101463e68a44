//! Main server facade.

use crate::config::ServerConfig;
use crate::handler::{HandlerContext, RequestHandler, RequestStats};
use crate::response::Response;
use hashkv_core::{Config, CoreResult, Manager};
use std::sync::Arc;
use tracing::info;

/// The HashKV server.
///
/// Owns a request handler over a shared [`Manager`]. There is no network
/// listener; a transport layer passes each request to [`KvServer::handle`].
///
/// # Example
///
/// ```
/// use hashkv_core::Config;
/// use hashkv_server::{KvServer, ServerConfig};
///
/// let server = KvServer::open(ServerConfig::default(), Config::default()).unwrap();
/// let response = server.handle("POST", "/entries/5", b"x");
/// assert_eq!(response.status, 200);
/// ```
pub struct KvServer {
    handler: RequestHandler,
    context: Arc<HandlerContext>,
}

impl KvServer {
    /// Creates a server over an existing manager.
    pub fn new(config: ServerConfig, manager: Arc<Manager>) -> Self {
        let context = Arc::new(HandlerContext::new(config, manager));
        let handler = RequestHandler::new(Arc::clone(&context));

        Self { handler, context }
    }

    /// Opens a manager from `store_config` and serves it.
    ///
    /// # Errors
    ///
    /// Returns an error if the manager cannot be opened.
    pub fn open(config: ServerConfig, store_config: Config) -> CoreResult<Self> {
        let manager = Arc::new(Manager::open(store_config)?);
        info!(buckets = manager.bucket_count(), "server ready");
        Ok(Self::new(config, manager))
    }

    /// Handles one request.
    pub fn handle(&self, method: &str, path: &str, body: &[u8]) -> Response {
        self.handler.handle(method, path, body)
    }

    /// Returns the served manager.
    pub fn manager(&self) -> &Arc<Manager> {
        &self.context.manager
    }

    /// Returns the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.context.config
    }

    /// Returns request counters.
    pub fn stats(&self) -> RequestStats {
        self.context.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_lifecycle() {
        let server = KvServer::open(ServerConfig::default(), Config::default()).unwrap();
        assert_eq!(server.manager().bucket_count(), 4);
        assert_eq!(server.stats().total, 0);

        server.handle("GET", "/", b"");
        assert_eq!(server.stats().total, 1);
    }

    #[test]
    fn custom_banner() {
        let server = KvServer::open(
            ServerConfig::new().with_banner("node-a"),
            Config::default(),
        )
        .unwrap();
        assert_eq!(server.handle("GET", "/", b"").body, "node-a");
        assert_eq!(server.config().banner, "node-a");
    }

    #[test]
    fn shares_manager() {
        let manager = Arc::new(Manager::open(Config::default()).unwrap());
        let a = KvServer::new(ServerConfig::default(), Arc::clone(&manager));
        let b = KvServer::new(ServerConfig::default(), manager);

        a.handle("POST", "/entries/3", b"c");
        assert_eq!(b.handle("GET", "/entries/3", b"").status, 200);
    }
}
