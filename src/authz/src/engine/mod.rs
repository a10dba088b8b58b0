//! Scope authorizer
//!
//! Decides whether a principal's granted scopes satisfy the scope an
//! endpoint requires.
//!
//! ```text
//! Principal ─┐
//!            ├─> ScopeAuthorizer::check_endpoint ─> EndpointPolicy lookup ─> authorize ─> Decision
//! Endpoint ──┘
//! ```
//!
//! The authorizer holds nothing but an `Arc` of the immutable policy
//! table, so it can be cloned into every request task and called
//! concurrently without locking.

use std::sync::Arc;
use tracing::trace;

use crate::error::{AuthzError, Result};
use crate::policy::EndpointPolicy;
use crate::scope::GrantedScopes;
use crate::types::{Decision, Principal};

/// Check a required scope against a granted set
///
/// Returns [`Decision::Allow`] iff `required` is an element of `granted`,
/// using exact, case-sensitive comparison. An empty `required` scope is a
/// deployment mistake and yields [`AuthzError::Configuration`] instead of a
/// decision.
///
/// ```
/// use taskgate_authz::{authorize, Decision, GrantedScopes};
///
/// let granted = GrantedScopes::from_claim("readtask").unwrap();
/// assert_eq!(authorize(&granted, "readtask").unwrap(), Decision::Allow);
/// assert_eq!(authorize(&granted, "updatetask").unwrap(), Decision::Deny);
/// assert!(authorize(&granted, "").is_err());
/// ```
pub fn authorize(granted: &GrantedScopes, required: &str) -> Result<Decision> {
    if required.is_empty() {
        return Err(AuthzError::Configuration(
            "required scope is empty".to_string(),
        ));
    }

    Ok(Decision::from(granted.contains(required)))
}

/// Endpoint-aware authorizer over an immutable policy table
#[derive(Debug, Clone)]
pub struct ScopeAuthorizer {
    policy: Arc<EndpointPolicy>,
}

impl ScopeAuthorizer {
    pub fn new(policy: Arc<EndpointPolicy>) -> Self {
        Self { policy }
    }

    /// Authorizer over the built-in task policy
    pub fn with_task_defaults() -> Self {
        Self::new(Arc::new(EndpointPolicy::task_defaults()))
    }

    /// The policy table this authorizer evaluates against
    pub fn policy(&self) -> &EndpointPolicy {
        &self.policy
    }

    /// Same as the free [`authorize`] function
    pub fn authorize(&self, granted: &GrantedScopes, required: &str) -> Result<Decision> {
        authorize(granted, required)
    }

    /// Check a principal against the scope declared for an endpoint
    ///
    /// An endpoint with no declaration is a configuration error: guards
    /// are only ever installed on declared endpoints.
    pub fn check_endpoint(
        &self,
        principal: &Principal,
        method: &str,
        path: &str,
    ) -> Result<Decision> {
        let required = self.policy.required_scope(method, path).ok_or_else(|| {
            AuthzError::Configuration(format!("no required scope declared for {} {}", method, path))
        })?;

        let decision = authorize(&principal.scopes, required.as_str())?;

        trace!(
            principal = %principal.id,
            method,
            path,
            required = %required,
            decision = %decision,
            "Evaluated endpoint scope"
        );

        Ok(decision)
    }
}

impl Default for ScopeAuthorizer {
    fn default() -> Self {
        Self::with_task_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn granted(claim: &str) -> GrantedScopes {
        GrantedScopes::from_claim(claim).unwrap()
    }

    #[test]
    fn test_authorize_allows_member() {
        assert_eq!(authorize(&granted("readtask"), "readtask").unwrap(), Decision::Allow);
    }

    #[test]
    fn test_authorize_denies_non_member() {
        assert_eq!(authorize(&granted("readtask"), "updatetask").unwrap(), Decision::Deny);
    }

    #[test]
    fn test_authorize_empty_set_denies() {
        assert_eq!(authorize(&GrantedScopes::new(), "readtask").unwrap(), Decision::Deny);
    }

    #[test]
    fn test_authorize_empty_required_is_configuration_error() {
        let err = authorize(&granted("readtask"), "").unwrap_err();
        assert!(err.is_configuration());

        let err = authorize(&GrantedScopes::new(), "").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_authorize_is_case_sensitive() {
        assert_eq!(authorize(&granted("ReadTask"), "readtask").unwrap(), Decision::Deny);
    }

    #[test]
    fn test_no_scope_hierarchy() {
        assert_eq!(authorize(&granted("updatetask"), "readtask").unwrap(), Decision::Deny);
    }

    #[test]
    fn test_check_endpoint() {
        let authorizer = ScopeAuthorizer::with_task_defaults();
        let reader = Principal::from_claim("reader", "readtask").unwrap();

        assert_eq!(
            authorizer.check_endpoint(&reader, "GET", "/task").unwrap(),
            Decision::Allow
        );
        assert_eq!(
            authorizer.check_endpoint(&reader, "POST", "/task").unwrap(),
            Decision::Deny
        );
    }

    #[test]
    fn test_check_undeclared_endpoint() {
        let authorizer = ScopeAuthorizer::with_task_defaults();
        let principal = Principal::from_claim("admin", "readtask updatetask").unwrap();

        let err = authorizer
            .check_endpoint(&principal, "DELETE", "/task")
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_authorizer_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ScopeAuthorizer>();
    }
}
