use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use taskgate_authz::AuthzError;
use tracing::error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// `WWW-Authenticate` challenge for requests without usable credentials
pub const BEARER_CHALLENGE: &str = "Bearer";

/// `WWW-Authenticate` challenge for a valid token lacking the endpoint's scope
pub const INSUFFICIENT_SCOPE_CHALLENGE: &str = r#"Bearer error="insufficient_scope""#;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    /// The scope is kept for logs only; it never reaches the response body.
    #[error("Forbidden: missing scope '{required_scope}'")]
    Forbidden { required_scope: String },

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::AuthorizationDenied { required_scope } => {
                ApiError::Forbidden { required_scope }
            }
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, challenge) = match &self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized", Some(BEARER_CHALLENGE)),
            ApiError::Forbidden { .. } => (
                StatusCode::FORBIDDEN,
                "Forbidden",
                Some(INSUFFICIENT_SCOPE_CHALLENGE),
            ),
            ApiError::InternalError(detail) => {
                error!(error = %detail, "Request failed with internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", None)
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        let mut response = (status, body).into_response();
        if let Some(challenge) = challenge {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(challenge));
        }
        response
    }
}
