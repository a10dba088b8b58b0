//! Core authorization types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AuthzError, Result};
use crate::scope::{GrantedScopes, Scope};

/// Principal (user, service account, client) making a request
///
/// Built by the authentication layer for a single request and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Opaque caller identifier (e.g., "alice@example.com", a client id)
    pub id: String,

    /// Scopes granted by the verified token
    #[serde(default)]
    pub scopes: GrantedScopes,
}

impl Principal {
    /// Create a principal with no granted scopes
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            scopes: GrantedScopes::new(),
        }
    }

    /// Create a principal from its id and a space-delimited `scope` claim
    pub fn from_claim(id: impl Into<String>, scope_claim: &str) -> Result<Self> {
        Ok(Self {
            id: id.into(),
            scopes: GrantedScopes::from_claim(scope_claim)?,
        })
    }

    /// Add a granted scope
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scopes.insert(scope);
        self
    }

    /// Replace the granted scopes
    pub fn with_scopes(mut self, scopes: GrantedScopes) -> Self {
        self.scopes = scopes;
        self
    }
}

/// An endpoint identified by HTTP method and exact path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EndpointKey {
    /// Upper-case method token (GET, POST, ...)
    pub method: String,

    /// Exact request path, no patterns or parameters
    pub path: String,
}

impl EndpointKey {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Outcome of an authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Converts a deny into [`AuthzError::AuthorizationDenied`]
    pub fn into_result(self, required_scope: &str) -> Result<()> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny => Err(AuthzError::AuthorizationDenied {
                required_scope: required_scope.to_string(),
            }),
        }
    }

    /// Lower-case label for logs and metrics
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
        }
    }
}

impl From<bool> for Decision {
    fn from(allowed: bool) -> Self {
        if allowed {
            Self::Allow
        } else {
            Self::Deny
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
