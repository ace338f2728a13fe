use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// The console front-end prints `user_message()` for the same variants.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Maps error: {0}")]
    Maps(String),

    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Llm(_) => (StatusCode::BAD_GATEWAY, "LLM_ERROR"),
            AppError::Maps(_) => (StatusCode::BAD_GATEWAY, "MAPS_ERROR"),
            AppError::NotConfigured(_) => (StatusCode::SERVICE_UNAVAILABLE, "NOT_CONFIGURED"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Text safe to show an end user. Upstream details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Llm(_) => {
                "The recommendation model could not be reached. Please try again later.".to_string()
            }
            AppError::Maps(_) => {
                "The maps service could not be reached. Please try again later.".to_string()
            }
            AppError::NotConfigured(msg) => msg.clone(),
            AppError::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();

        match &self {
            AppError::Llm(msg) => tracing::error!("LLM error: {msg}"),
            AppError::Maps(msg) => tracing::error!("Maps error: {msg}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            AppError::NotConfigured(msg) => tracing::warn!("Not configured: {msg}"),
            AppError::Validation(_) => {}
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.user_message()
            }
        }));

        (status, body).into_response()
    }
}
