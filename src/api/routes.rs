use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;

/// Creates the main router: a health probe and the update webhook
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/webhook/:secret", post(handlers::webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
