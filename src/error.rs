use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Faults that end an invocation with a 500. Spam rejections and foreign
/// forms are not errors and never reach this type.
#[derive(Debug)]
pub enum AppError {
    MalformedInput(String),
    ConfigMissing(String),
    Upstream(String),
    Internal(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::MalformedInput(msg) => write!(f, "Malformed input: {msg}"),
            AppError::ConfigMissing(msg) => write!(f, "Missing configuration: {msg}"),
            AppError::Upstream(msg) => write!(f, "Upstream failure: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::MalformedInput(msg) => {
                tracing::error!("Malformed submission body: {msg}");
                msg.clone()
            }
            AppError::ConfigMissing(msg) => {
                tracing::error!("Missing configuration: {msg}");
                "Service not configured".to_string()
            }
            AppError::Upstream(msg) => {
                tracing::error!("Upstream failure: {msg}");
                "Failed to deliver notification".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                "Internal server error".to_string()
            }
        };

        let body = json!({ "error": message });
        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}
