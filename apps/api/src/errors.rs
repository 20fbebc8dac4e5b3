use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::GenerationError;

/// Field name → messages, rendered under `details.fieldErrors`. Ordered so
/// error bodies are stable across runs.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Application-level error type.
/// Implements `IntoResponse` so handlers can return `Result<T, AppError>`.
/// The rendered bodies are part of the wire contract with the browser
/// client and must not change shape.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Invalid request body")]
    InvalidBody,

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Upstream generation failed: {0}")]
    Upstream(#[from] GenerationError),

    #[error("Scoring failed")]
    ScoringFailed,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({ "error": "Rate limit exceeded. Try again later." }),
            ),
            AppError::InvalidBody => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid request body." }),
            ),
            AppError::Validation(field_errors) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Invalid request.",
                    "details": { "fieldErrors": field_errors }
                }),
            ),
            AppError::Upstream(e) => {
                match &e {
                    GenerationError::Api {
                        status: Some(code), ..
                    } => tracing::error!("Upstream generation failed (HTTP {code}): {e}"),
                    _ => tracing::error!("Upstream generation failed: {e}"),
                }
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "error": "Generation failed. Please try again." }),
                )
            }
            AppError::ScoringFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Scoring failed. Please try again." }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
