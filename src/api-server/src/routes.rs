//! Route definitions for the API server
//!
//! Routes are organized by access:
//! - Public: health and metrics
//! - Guarded: task endpoints, each wrapped in its own scope guard

use axum::{
    handler::Handler,
    http::Method,
    middleware as axum_middleware,
    routing::{get, on, MethodFilter, MethodRouter},
    Router,
};
use std::collections::HashSet;
use taskgate_authz::{AuthzError, EndpointKey};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    auth,
    guard::{require_scope, ScopeGuard},
    handlers, middleware,
    state::AppState,
};

struct Endpoint {
    key: EndpointKey,
    route: MethodRouter<AppState>,
}

/// Registers guarded endpoints and checks them against the policy table
///
/// Every endpoint must have a declared scope; [`TaskRouter::build`] fails
/// with [`AuthzError::Configuration`] otherwise, so a misconfigured
/// service refuses to start instead of serving unguarded routes.
pub struct TaskRouter {
    state: AppState,
    endpoints: Vec<Endpoint>,
    error: Option<AuthzError>,
}

impl TaskRouter {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            endpoints: Vec::new(),
            error: None,
        }
    }

    /// Router with the task endpoints registered
    pub fn with_task_endpoints(state: AppState) -> Self {
        Self::new(state)
            .guarded(Method::GET, "/task", handlers::get_task)
            .guarded(Method::POST, "/task", handlers::update_task)
    }

    /// Register an endpoint whose handler runs only after the scope guard allows
    pub fn guarded<H, T>(mut self, method: Method, path: &str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        let key = EndpointKey::new(method.as_str(), path);
        match MethodFilter::try_from(method) {
            Ok(filter) => self.endpoints.push(Endpoint {
                key,
                route: on(filter, handler),
            }),
            Err(_) => {
                self.error.get_or_insert_with(|| {
                    AuthzError::Configuration(format!("unsupported method for {}", key))
                });
            }
        }
        self
    }

    /// Build the guarded routes, without state or outer middleware
    pub fn build(self) -> Result<Router<AppState>, AuthzError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        if self.endpoints.is_empty() {
            return Ok(Router::new());
        }

        let authorizer = self.state.authorizer.clone();
        let mut seen = HashSet::new();
        let mut router = Router::new();

        for endpoint in self.endpoints {
            if !seen.insert(endpoint.key.clone()) {
                return Err(AuthzError::Configuration(format!(
                    "endpoint {} registered twice",
                    endpoint.key
                )));
            }

            let required = authorizer
                .policy()
                .get(&endpoint.key)
                .cloned()
                .ok_or_else(|| {
                    AuthzError::Configuration(format!(
                        "no required scope declared for {}",
                        endpoint.key
                    ))
                })?;

            info!(endpoint = %endpoint.key, scope = %required, "Guarding endpoint");

            let guard = ScopeGuard::new(authorizer.clone(), self.state.metrics.clone(), required);
            let route = endpoint
                .route
                .route_layer(axum_middleware::from_fn_with_state(guard, require_scope));
            router = router.route(&endpoint.key.path, route);
        }

        Ok(router.route_layer(axum_middleware::from_fn_with_state(
            self.state,
            auth::authenticate,
        )))
    }
}

/// Create the application router with all routes and middleware
///
/// Fails when a task endpoint has no scope declared in the state's policy.
pub fn create_router(state: AppState) -> Result<Router, AuthzError> {
    let guarded = TaskRouter::with_task_endpoints(state.clone()).build()?;

    Ok(Router::new()
        // Health and metrics (no auth required)
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .merge(guarded)
        .with_state(state)
        // Add middleware layers (executed bottom to top)
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(middleware::cors_layer())
        .layer(TraceLayer::new_for_http()))
}
