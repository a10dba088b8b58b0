//! Taskgate API server
//!
//! Serves `GET /task` and `POST /task` behind bearer authentication and a
//! per-route OAuth2 scope guard.

pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, Result};
pub use server::{Server, ServerBuilder, ServerConfig};
pub use state::AppState;

/// Health check response
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}
