//! Route definitions for the reqtrack HTTP API.
//!
//! The tracking middleware wraps every routed request; the principal
//! middleware sits outside it so the principal is in the request
//! extensions by the time the capture runs.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new().merge(admin_routes());

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(handlers::health::health))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::track::track_request,
        ))
        .layer(axum_middleware::from_fn(
            middleware::principal::extract_principal,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Admin log browsing and maintenance endpoints
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/logs", get(handlers::admin::logs::list_logs))
        .route("/admin/logs/prune", post(handlers::admin::logs::prune_logs))
        .route("/admin/flush", post(handlers::admin::logs::flush_buffer))
}
