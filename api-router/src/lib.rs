use api_state::ApiState;
use axum::{
    extract::{DefaultBodyLimit, FromRef},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use middleware_api_auth::api_auth;
use routes::{
    health::{health, root},
    run::run_submission,
};

pub mod api_state;
pub mod error;
mod middleware_api_auth;
mod routes;

/// Public, unauthenticated endpoints (for load balancers and probes)
pub fn health_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    ApiState: FromRef<S>,
{
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

/// Router for API functionality, version 1
pub fn api_routes_v1<S>(app_state: &ApiState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    ApiState: FromRef<S>,
{
    // Protected endpoints (require auth)
    Router::new()
        .route(
            "/run",
            post(run_submission).layer(DefaultBodyLimit::max(app_state.config.max_body_bytes)),
        )
        .route_layer(from_fn_with_state(app_state.clone(), api_auth))
}
