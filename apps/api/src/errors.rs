use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::cv::validation::ValidationIssue;
use crate::render::GenerationError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("CV failed validation with {} issue(s)", .0.len())]
    InvalidCv(Vec<ValidationIssue>),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            AppError::InvalidCv(issues) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_CV",
                self.to_string(),
                Some(json!(issues)),
            ),
            AppError::Generation(GenerationError::Template(msg)) => (
                StatusCode::BAD_REQUEST,
                "INVALID_TEMPLATE",
                msg.clone(),
                None,
            ),
            AppError::Generation(e) => {
                tracing::error!("Generation error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "GENERATION_ERROR",
                    "The document could not be generated".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
