//! Error types for the scope authorizer

use thiserror::Error;

/// Authorization errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
    /// Missing or empty scope declaration for an endpoint.
    ///
    /// Raised at startup when the policy table is built, or when a check
    /// is made against an endpoint that was never declared.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The principal lacks the scope required by the endpoint
    #[error("Authorization denied: missing scope '{required_scope}'")]
    AuthorizationDenied { required_scope: String },

    /// Invalid scope string
    #[error("Invalid scope: {0}")]
    InvalidScope(String),
}

impl AuthzError {
    /// Whether this error comes from a deployment mistake rather than the request
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;
