//! Error responses for the storefront API.
//!
//! CMS failures are handled where they happen: list routes serve an empty
//! page and the order route answers with an `OrderResponse`. What remains
//! here are requests the API refuses to run.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type for the storefront API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        let message = match self {
            Self::BadRequest(msg) => msg,
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
