//! Poll server listener
//!
//! Binds the TCP listener and serves the HTTP/WebSocket router on it.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::error::Result;
use crate::hub::BroadcastHub;
use crate::server::config::ServerConfig;
use crate::server::routes;

/// Poll server
pub struct PollServer {
    config: ServerConfig,
    hub: Arc<BroadcastHub>,
}

impl PollServer {
    /// Create a new server with the given configuration
    pub fn new(config: ServerConfig) -> Self {
        let hub = BroadcastHub::with_config(config.store.clone(), config.hub.clone());
        Self::with_hub(config, Arc::new(hub))
    }

    /// Create a server around an existing hub
    pub fn with_hub(config: ServerConfig, hub: Arc<BroadcastHub>) -> Self {
        Self { config, hub }
    }

    /// Get a reference to the broadcast hub
    pub fn hub(&self) -> &Arc<BroadcastHub> {
        &self.hub
    }

    /// The application router, without binding anything
    pub fn router(&self) -> Router {
        routes::router(Arc::clone(&self.hub))
    }

    /// Run the server
    ///
    /// This method blocks until the server fails.
    pub async fn run(&self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Run the server with graceful shutdown
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "Poll server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        Ok(())
    }

    /// Get the bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }
}
