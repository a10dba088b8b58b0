//! Cross-cutting middleware
//!
//! - Request ID tracking
//! - Request logging
//! - CORS configuration
//!
//! Authentication lives in [`crate::auth`], authorization in [`crate::guard`].

use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use uuid::Uuid;

/// Request ID header name
pub const X_REQUEST_ID: &str = "x-request-id";

/// Configure CORS middleware
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static(X_REQUEST_ID),
        ])
        .expose_headers([header::WWW_AUTHENTICATE, HeaderName::from_static(X_REQUEST_ID)])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Request ID middleware
///
/// Reuses a caller-supplied UUID or generates one, stores it in the request
/// extensions and echoes it on the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    request.extensions_mut().insert(request_id);

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }

    response
}

/// Request logging middleware
///
/// Logs method, URI, status and latency. Level follows the status class.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .extensions()
        .get::<Uuid>()
        .copied()
        .unwrap_or_else(Uuid::new_v4);

    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        "Incoming request"
    );

    let start = std::time::Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed();

    let status = response.status();
    macro_rules! completed {
        ($level:expr) => {
            tracing::event!(
                $level,
                request_id = %request_id,
                method = %method,
                uri = %uri,
                status = status.as_u16(),
                duration_ms = elapsed.as_millis() as u64,
                "Request completed"
            )
        };
    }

    match status.as_u16() {
        500..=599 => completed!(tracing::Level::ERROR),
        400..=499 => completed!(tracing::Level::WARN),
        _ => completed!(tracing::Level::INFO),
    }

    response
}
