use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Instant;
use taskgate_authz::{EndpointPolicy, ScopeAuthorizer};

use crate::auth::{Authenticator, StaticTokenAuthenticator};
use crate::config::AppConfig;
use crate::metrics::Metrics;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Scope authorizer over the immutable endpoint policy
    pub authorizer: ScopeAuthorizer,

    /// Authentication provider
    pub authenticator: Arc<dyn Authenticator>,

    /// Decision and authentication counters
    pub metrics: Metrics,

    /// Server start time for uptime calculation
    pub start_time: Instant,

    /// Application version
    pub version: String,
}

impl AppState {
    pub fn new(
        policy: EndpointPolicy,
        authenticator: Arc<dyn Authenticator>,
    ) -> Result<Self> {
        Ok(Self {
            authorizer: ScopeAuthorizer::new(Arc::new(policy)),
            authenticator,
            metrics: Metrics::new().context("Failed to register metrics")?,
            start_time: Instant::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    /// Build state from a validated configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let policy = config.endpoint_policy()?;
        let authenticator = StaticTokenAuthenticator::from_entries(&config.tokens)
            .context("Invalid token configuration")?;

        Self::new(policy, Arc::new(authenticator))
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
