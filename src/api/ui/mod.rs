//! Server-rendered single page

pub mod handlers;
pub mod page;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

/// Create the page router
pub fn create_ui_router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::index))
        .route("/predict", post(handlers::predict))
}
