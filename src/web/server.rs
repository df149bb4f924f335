//! Web server for newsfeed.

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::news::EntryStore;

use super::handlers::AppState;
use super::router::create_router;

/// Web server for the news API and static files.
pub struct WebServer {
    /// Host to bind.
    host: String,
    /// Port to bind.
    port: u16,
    /// Directory served outside `/api`.
    static_dir: PathBuf,
    /// Application state.
    app_state: Arc<AppState>,
}

impl WebServer {
    /// Create a new web server reading entries from `store`.
    pub fn new(config: &ServerConfig, store: Arc<dyn EntryStore>) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            static_dir: PathBuf::from(&config.static_dir),
            app_state: Arc::new(AppState::new(store)),
        }
    }

    /// Configured bind address as `host:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn router(&self) -> Router {
        create_router(self.app_state.clone(), &self.static_dir)
    }

    async fn bind(&self) -> Result<TcpListener, std::io::Error> {
        TcpListener::bind((self.host.as_str(), self.port)).await
    }

    /// Run the web server until `shutdown` resolves.
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn run<F>(self, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.router();
        let listener = self.bind().await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Web server stopped");
        Ok(())
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr, std::io::Error> {
        let router = self.router();
        let listener = self.bind().await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
