//! Authentication provider seam
//!
//! The guard trusts whatever [`Principal`] an [`Authenticator`] hands back.
//! Token verification is the provider's concern; the provider shipped here
//! resolves opaque bearer tokens against a table loaded from configuration.

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use taskgate_authz::Principal;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::TokenEntry;
use crate::error::ApiError;
use crate::state::AppState;

/// Resolves the caller of a request
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns the verified principal, or `None` when the request carries
    /// no usable credentials
    async fn authenticate(&self, headers: &HeaderMap) -> Option<Principal>;
}

/// Extract the token from an `Authorization: Bearer <token>` header
///
/// The scheme name is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Authenticator backed by a fixed token table
#[derive(Debug, Clone, Default)]
pub struct StaticTokenAuthenticator {
    tokens: HashMap<String, Principal>,
}

impl StaticTokenAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from configuration entries, failing on a malformed scope claim
    pub fn from_entries(entries: &[TokenEntry]) -> taskgate_authz::Result<Self> {
        let mut authenticator = Self::new();
        for entry in entries {
            let principal = Principal::from_claim(&entry.principal, &entry.scope)?;
            authenticator.tokens.insert(entry.token.clone(), principal);
        }
        Ok(authenticator)
    }

    /// Register a token
    pub fn with_token(mut self, token: impl Into<String>, principal: Principal) -> Self {
        self.tokens.insert(token.into(), principal);
        self
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn authenticate(&self, headers: &HeaderMap) -> Option<Principal> {
        let token = bearer_token(headers)?;
        self.tokens.get(token).cloned()
    }
}

/// Authentication middleware
///
/// Stores the resolved [`Principal`] in the request extensions, where the
/// scope guard and handlers pick it up. Requests without a principal stop
/// here with 401.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let request_id = request
        .extensions()
        .get::<Uuid>()
        .copied()
        .unwrap_or_else(Uuid::new_v4);

    match state.authenticator.authenticate(request.headers()).await {
        Some(principal) => {
            debug!(
                request_id = %request_id,
                principal = %principal.id,
                "Request authenticated"
            );
            request.extensions_mut().insert(principal);
            Ok(next.run(request).await)
        }
        None => {
            warn!(
                request_id = %request_id,
                path = %request.uri().path(),
                "Missing or unknown bearer token"
            );
            state.metrics.record_authn_failure();
            Err(ApiError::Unauthorized)
        }
    }
}
