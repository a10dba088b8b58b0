//! Taskgate API Server
//!
//! Entry point for the scope-guarded task service.
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings (0.0.0.0:8080, built-in task policy)
//! cargo run --bin taskgate-server
//!
//! # Load policy and bearer tokens from a file, override the port
//! cargo run --bin taskgate-server -- --config taskgate.toml --port 9090
//!
//! # Enable debug logging
//! RUST_LOG=debug cargo run --bin taskgate-server
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Logging filter (trace, debug, info, warn, error)
//! - `TASKGATE_CONFIG`: Path to the TOML configuration file
//! - `TASKGATE_HOST`: Server host (default: from config, else 0.0.0.0)
//! - `TASKGATE_PORT`: Server port (default: from config, else 8080)
//! - `TASKGATE_REQUEST_TIMEOUT`: Request timeout in seconds
//! - `TASKGATE_JSON_LOGS`: Emit JSON log lines

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use taskgate_api_server::{config::AppConfig, server::ServerBuilder, state::AppState, ServerConfig};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Scope-guarded task API server
#[derive(Parser, Debug)]
#[command(
    name = "taskgate-server",
    version,
    about = "Task API guarded by OAuth2 scope checks",
    long_about = None
)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short = 'c', long, env = "TASKGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(short = 'H', long, env = "TASKGATE_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short = 'p', long, env = "TASKGATE_PORT")]
    port: Option<u16>,

    /// Request timeout in seconds
    #[arg(long, env = "TASKGATE_REQUEST_TIMEOUT")]
    request_timeout: Option<u64>,

    /// Enable JSON logging format
    #[arg(long, env = "TASKGATE_JSON_LOGS")]
    json_logs: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// Load the configuration file, then apply command-line overrides
    fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(timeout) = self.request_timeout {
            config.server.request_timeout_secs = timeout;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args);

    info!("Starting Taskgate API Server");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = match args.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(2);
        }
    };

    let state = AppState::from_config(&config)?;
    for (endpoint, scope) in state.authorizer.policy().iter() {
        info!(endpoint = %endpoint, scope = %scope, "Endpoint policy");
    }
    if config.tokens.is_empty() {
        warn!("No bearer tokens configured; every task request will be rejected with 401");
    }

    let server = ServerBuilder::new()
        .config(ServerConfig::from(&config.server))
        .state(state)
        .build()?;

    if let Err(e) = server.run().await {
        error!("Server error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Initialize tracing/logging subsystem
fn init_tracing(args: &Args) {
    let log_level = args.log_level.parse::<tracing::Level>().unwrap_or_else(|_| {
        eprintln!("Invalid log level '{}', using 'info'", args.log_level);
        tracing::Level::INFO
    });

    let framework_level = if log_level <= tracing::Level::DEBUG { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "taskgate_api_server={},taskgate_server={},taskgate_authz={},tower_http={},axum={}",
            log_level, log_level, log_level, framework_level, framework_level
        )
        .into()
    });

    if args.json_logs {
        // JSON structured logging for production
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Human-readable logging for development
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(vec![
            "taskgate-server",
            "--host",
            "127.0.0.1",
            "--port",
            "9090",
            "--request-timeout",
            "60",
        ]);

        assert_eq!(args.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(args.port, Some(9090));
        assert_eq!(args.request_timeout, Some(60));
        assert!(!args.json_logs);
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(vec!["taskgate-server"]);

        assert!(args.config.is_none());
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_overrides_apply_over_defaults() {
        let args = Args::parse_from(vec!["taskgate-server", "--port", "7000"]);
        let config = args.resolve_config().unwrap();

        assert_eq!(config.server.port, 7000);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let args = Args::parse_from(vec!["taskgate-server", "--request-timeout", "0"]);
        assert!(args.resolve_config().is_err());
    }
}
