//! Web server for folio.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::{Config, ServerConfig};
use crate::{FolioError, Result};

use super::handlers::AppState;
use super::router::create_router;

/// HTTP server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Server configuration.
    server_config: ServerConfig,
}

impl WebServer {
    /// Create a server with explicit state.
    pub fn new(config: &ServerConfig, app_state: AppState) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| {
                FolioError::Config(format!(
                    "invalid listen address {}:{}: {e}",
                    config.host, config.port
                ))
            })?;

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            server_config: config.clone(),
        })
    }

    /// Create a server with production state built from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.server, AppState::from_config(config)?)
    }

    /// Get the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    async fn bind(self) -> Result<(TcpListener, axum::Router)> {
        let router = create_router(self.app_state, &self.server_config);
        let listener = TcpListener::bind(self.addr).await?;
        Ok((listener, router))
    }

    /// Run the server until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let (listener, router) = self.bind().await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        tracing::info!("Web server stopped");
        Ok(())
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let (listener, router) = self.bind().await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
