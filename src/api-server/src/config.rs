//! Service configuration loading and validation

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use taskgate_authz::{EndpointPolicy, PolicyRule};

/// Complete service configuration
///
/// Every section is optional. Without `[[policy]]` entries the built-in
/// task policy applies; without `[[tokens]]` every request is rejected
/// as unauthenticated.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub policy: Vec<PolicyRule>,

    #[serde(default)]
    pub tokens: Vec<TokenEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// A bearer token accepted by the static authenticator
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenEntry {
    /// Opaque token value presented as `Authorization: Bearer <token>`
    pub token: String,
    /// Principal identifier the token resolves to
    pub principal: String,
    /// Space-delimited scope claim
    #[serde(default)]
    pub scope: String,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_request_timeout() -> u64 { 30 }

impl AppConfig {
    /// Load configuration from TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;

        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse configuration file")
    }

    /// Build the endpoint policy declared by this configuration
    pub fn endpoint_policy(&self) -> Result<EndpointPolicy> {
        if self.policy.is_empty() {
            return Ok(EndpointPolicy::task_defaults());
        }

        EndpointPolicy::from_rules(self.policy.iter().cloned())
            .context("Invalid endpoint policy")
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Server host must not be empty");
        }

        if self.server.request_timeout_secs == 0 {
            anyhow::bail!("Request timeout must be at least one second");
        }

        self.endpoint_policy()?;

        for (idx, entry) in self.tokens.iter().enumerate() {
            if entry.token.is_empty() {
                anyhow::bail!("Token entry {} has an empty token", idx);
            }
            if entry.principal.is_empty() {
                anyhow::bail!("Token entry {} has an empty principal", idx);
            }
        }

        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = self.tokens.iter().find(|e| !seen.insert(e.token.as_str())) {
            anyhow::bail!("Token for principal '{}' is declared twice", dup.principal);
        }

        Ok(())
    }
}
