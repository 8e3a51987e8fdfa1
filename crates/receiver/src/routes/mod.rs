//! API routes

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod health;
pub mod webhooks;

/// Build the receiver router
///
/// The alert subscription's `webhookUrl` points at the server root, so
/// deliveries arrive on `POST /`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(webhooks::kline))
        .route("/health", get(health::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
