// src/error.rs
//! Boundary error type. Handlers return `Result<T, EngineError>`; the body is
//! always `{ "error": "<message>" }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Missing or empty required input. Shown to the caller as-is.
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Request body could not be parsed.
    #[error("Invalid request body")]
    BadRequest(String),

    /// Defect in scoring or configuration. Details stay in the logs.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl EngineError {
    pub fn missing(field: &'static str, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            EngineError::Validation { .. } | EngineError::BadRequest(_) => StatusCode::BAD_REQUEST,
            EngineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, EngineError::Validation { .. })
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let message = match &self {
            EngineError::Validation { field, message } => {
                tracing::debug!(field = *field, "validation error");
                message.clone()
            }
            EngineError::BadRequest(detail) => {
                tracing::debug!(%detail, "rejected request body");
                self.to_string()
            }
            EngineError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal error occurred".to_string()
            }
        };

        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}
