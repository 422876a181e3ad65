//! Router assembly

use axum::{middleware, routing::get, Router};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use super::health;
use super::middleware::{logging_middleware, metrics_middleware, security_headers_middleware};
use super::state::AppState;
use super::ui;
use super::v1;

/// Create a minimal router without state (health and liveness only)
/// Note: /ready endpoint is not available without state
pub fn create_router() -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .layer(TraceLayer::new_for_http())
}

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    let static_files = ServeDir::new(state.ui.static_dir.as_str());

    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Page
        .merge(ui::create_ui_router())
        // JSON API
        .nest("/v1", v1::create_v1_router())
        .nest_service("/static", static_files)
        // Add state and middleware
        .with_state(state)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
