//! PDF text API endpoints
//!
//! - `POST /:method` runs `initDoc`, `getDocPageText` or `getDocText`
//!   with the JSON body as arguments
//! - `GET /stats` reports document cache statistics

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::dispatch::{MethodCall, MethodResult, PdfTextReply};
use crate::document::CacheStats;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create the PDF text router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/:method", post(call_method))
}

/// POST /api/v1/pdf-text/:method
///
/// An empty body is treated as no arguments.
async fn call_method(
    State(state): State<AppState>,
    Path(method): Path<String>,
    body: Bytes,
) -> Result<Json<PdfTextReply>> {
    let arguments = if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))?
    };

    tracing::debug!("Received {} call", method);

    match state
        .dispatcher()
        .call_method(MethodCall::new(method.clone(), arguments))
        .await
    {
        MethodResult::Success(reply) => Ok(Json(reply)),
        MethodResult::Error(err) => Err(err.into()),
        MethodResult::NotImplemented => Err(AppError::NotImplemented(method)),
    }
}

/// GET /api/v1/pdf-text/stats
async fn get_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.dispatcher().stats())
}
