use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{any, get},
    Router,
};

/// Builds the DoH router. `doh_path` is mounted for every method so that
/// unsupported ones reach the handler and get a DoH-specific 405.
pub fn create_api_routes(state: AppState, doh_path: &str) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(doh_path, any(handlers::dns_query))
        .with_state(state)
}
