//! Error types for the PDF text server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::dispatch::RequestError;
use crate::document::ErrorCode;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("Method not implemented: {0}")]
    NotImplemented(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidPath => StatusCode::NOT_FOUND,
        ErrorCode::InvalidPassword => StatusCode::UNAUTHORIZED,
        ErrorCode::InvalidArguments => StatusCode::BAD_REQUEST,
        ErrorCode::DocError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AppError::Request(err) => {
                if err.code == ErrorCode::DocError {
                    tracing::error!("Document error: {}", err.message);
                }
                (status_for(err.code), err.code.as_str().to_string(), err.message)
            }
            AppError::NotImplemented(method) => (
                StatusCode::NOT_IMPLEMENTED,
                "NOT_IMPLEMENTED".to_string(),
                format!("Method not implemented: {}", method),
            ),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidArguments.as_str().to_string(),
                msg,
            ),
        };

        (status, Json(ErrorResponse { error, message })).into_response()
    }
}
