//! Endpoint policy: which scope each endpoint requires
//!
//! The table is built once at startup and never mutated. Lookups are
//! exact on method and path.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::error::{AuthzError, Result};
use crate::scope::Scope;
use crate::types::EndpointKey;

/// Scope required to read a task
pub const READ_TASK_SCOPE: &str = "readtask";

/// Scope required to update a task
pub const UPDATE_TASK_SCOPE: &str = "updatetask";

/// One policy declaration, as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRule {
    /// HTTP method (case-insensitive on input, stored upper-case)
    pub method: String,

    /// Exact request path
    pub path: String,

    /// Required scope
    #[serde(default)]
    pub scope: String,
}

impl PolicyRule {
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            scope: scope.into(),
        }
    }
}

/// Immutable mapping from endpoint to required scope
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointPolicy {
    rules: HashMap<EndpointKey, Scope>,
}

impl EndpointPolicy {
    /// Start declaring a policy table
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::default()
    }

    /// Build a table from configuration rules
    ///
    /// Fails with [`AuthzError::Configuration`] on an empty method, path or
    /// scope, a malformed scope, or a duplicate endpoint.
    pub fn from_rules(rules: impl IntoIterator<Item = PolicyRule>) -> Result<Self> {
        let mut table = HashMap::new();

        for rule in rules {
            let method = rule.method.trim().to_ascii_uppercase();
            if method.is_empty() {
                return Err(AuthzError::Configuration(format!(
                    "policy for path '{}' has no method",
                    rule.path
                )));
            }
            if rule.path.is_empty() {
                return Err(AuthzError::Configuration(format!(
                    "policy for method {} has no path",
                    method
                )));
            }

            let key = EndpointKey::new(method, rule.path);
            if rule.scope.is_empty() {
                return Err(AuthzError::Configuration(format!(
                    "no required scope declared for {}",
                    key
                )));
            }
            let scope = Scope::new(rule.scope).map_err(|e| {
                AuthzError::Configuration(format!("invalid scope for {}: {}", key, e))
            })?;

            if table.contains_key(&key) {
                return Err(AuthzError::Configuration(format!(
                    "duplicate policy for {}",
                    key
                )));
            }

            debug!(endpoint = %key, scope = %scope, "Registered endpoint policy");
            table.insert(key, scope);
        }

        Ok(Self { rules: table })
    }

    /// The task service's policy: read and update each need their own scope
    pub fn task_defaults() -> Self {
        let mut rules = HashMap::new();
        rules.insert(
            EndpointKey::new("GET", "/task"),
            Scope::new_unchecked(READ_TASK_SCOPE),
        );
        rules.insert(
            EndpointKey::new("POST", "/task"),
            Scope::new_unchecked(UPDATE_TASK_SCOPE),
        );
        Self { rules }
    }

    /// Scope required by an endpoint, if one is declared
    pub fn required_scope(&self, method: &str, path: &str) -> Option<&Scope> {
        self.rules.get(&EndpointKey::new(method, path))
    }

    pub fn get(&self, key: &EndpointKey) -> Option<&Scope> {
        self.rules.get(key)
    }

    /// Declared endpoints in a stable order
    pub fn iter(&self) -> impl Iterator<Item = (&EndpointKey, &Scope)> {
        let mut entries: Vec<_> = self.rules.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Builder for [`EndpointPolicy`]
///
/// ```
/// use taskgate_authz::EndpointPolicy;
///
/// let policy = EndpointPolicy::builder()
///     .require("GET", "/task", "readtask")
///     .require("POST", "/task", "updatetask")
///     .build()
///     .unwrap();
///
/// assert_eq!(policy.required_scope("GET", "/task").unwrap().as_str(), "readtask");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PolicyBuilder {
    rules: Vec<PolicyRule>,
}

impl PolicyBuilder {
    /// Declare the scope an endpoint requires
    pub fn require(
        mut self,
        method: impl Into<String>,
        path: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        self.rules.push(PolicyRule::new(method, path, scope));
        self
    }

    pub fn build(self) -> Result<EndpointPolicy> {
        EndpointPolicy::from_rules(self.rules)
    }
}
