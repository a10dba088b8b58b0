//! Per-route scope guard
//!
//! Each guarded route carries its own [`ScopeGuard`] holding the scope the
//! policy table declares for it. The guard runs after authentication and
//! before the handler.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use taskgate_authz::{Decision, Principal, Scope, ScopeAuthorizer};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::metrics::Metrics;

/// Guard state for one endpoint
#[derive(Clone)]
pub struct ScopeGuard {
    authorizer: ScopeAuthorizer,
    metrics: Metrics,
    required: Scope,
}

impl ScopeGuard {
    pub fn new(authorizer: ScopeAuthorizer, metrics: Metrics, required: Scope) -> Self {
        Self {
            authorizer,
            metrics,
            required,
        }
    }

    pub fn required(&self) -> &Scope {
        &self.required
    }
}

/// Scope guard middleware
///
/// Denies with 403 unless the authenticated principal holds the required
/// scope. The response never names the missing scope.
pub async fn require_scope(
    State(guard): State<ScopeGuard>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(principal) = request.extensions().get::<Principal>() else {
        warn!(path = %request.uri().path(), "Scope guard reached without a principal");
        return Err(ApiError::Unauthorized);
    };

    let decision = guard
        .authorizer
        .authorize(&principal.scopes, guard.required.as_str())?;
    guard.metrics.record_decision(decision);

    match decision {
        Decision::Allow => {
            debug!(
                principal = %principal.id,
                method = %request.method(),
                path = %request.uri().path(),
                scope = %guard.required,
                "Access granted"
            );
        }
        Decision::Deny => {
            warn!(
                principal = %principal.id,
                method = %request.method(),
                path = %request.uri().path(),
                scope = %guard.required,
                "Access denied: missing scope"
            );
        }
    }

    decision.into_result(guard.required.as_str())?;
    Ok(next.run(request).await)
}
