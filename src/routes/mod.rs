//! Route modules for the PDF text server

pub mod health;
pub mod pdf_text;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Build the application router
///
/// Tracing and CORS layers are added by the binary.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/health", get(health::health_check))
        .nest("/api/v1/pdf-text", pdf_text::router())
        .with_state(state)
}
