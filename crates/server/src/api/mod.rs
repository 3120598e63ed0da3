//! HTTP API using Axum.
//!
//! A single route, `POST /ask`, with permissive CORS and request tracing.

pub mod error;
pub mod handlers;


pub use error::ApiError;

use crate::state::AppState;
use axum::routing::post;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the application router.
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ask", post(handlers::ask))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
