//! HTTP server setup and lifecycle management
//!
//! This module handles:
//! - Server configuration
//! - Graceful shutdown on signals (SIGTERM, SIGINT)
//! - TCP listener setup

use crate::{config::ServerSection, routes, state::AppState};
use anyhow::{Context, Result};
use axum::Router;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::timeout::TimeoutLayer;
use tracing::{error, info};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Request timeout in seconds
    pub request_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout: 30,
        }
    }
}

impl From<&ServerSection> for ServerConfig {
    fn from(section: &ServerSection) -> Self {
        Self {
            host: section.host.clone(),
            port: section.port,
            request_timeout: section.request_timeout_secs,
        }
    }
}

/// HTTP server instance
pub struct Server {
    config: ServerConfig,
    app: Router,
}

impl Server {
    /// Create a new server, building the router up front
    ///
    /// Fails when the policy does not cover every guarded endpoint.
    pub fn new(config: ServerConfig, state: AppState) -> Result<Self> {
        let app = routes::create_router(state)
            .context("Refusing to start with an incomplete endpoint policy")?
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)));

        Ok(Self { config, app })
    }

    /// Start the server and block until shutdown signal
    pub async fn run(self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!("Configuration: {:?}", self.config);

        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind to {}", addr))?;

        self.serve(listener).await
    }

    /// Serve on an already-bound listener
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let local_addr = listener.local_addr()?;
        info!("Server listening on http://{}", local_addr);
        info!("Health check endpoint: http://{}/health", local_addr);

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")?;

        info!("Server shutdown complete");
        Ok(())
    }

    /// Get the server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The fully layered router
    pub fn router(&self) -> Router {
        self.app.clone()
    }
}

/// Wait for shutdown signal
///
/// Listens for:
/// - SIGTERM (kill command, docker stop, kubernetes)
/// - SIGINT (Ctrl+C)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}

/// Builder for creating a server with custom configuration
pub struct ServerBuilder {
    config: ServerConfig,
    state: Option<AppState>,
}

impl ServerBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            state: None,
        }
    }

    /// Start from an existing configuration
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the host to bind to
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the port to listen on
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the request timeout in seconds
    pub fn request_timeout(mut self, timeout: u64) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Set the application state
    pub fn state(mut self, state: AppState) -> Self {
        self.state = Some(state);
        self
    }

    /// Build the server
    pub fn build(self) -> Result<Server> {
        let state = self.state.context("Application state is required")?;

        Server::new(self.config, state)
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
