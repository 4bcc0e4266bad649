//! Maps domain errors to HTTP responses.
//!
//! Every error body has the shape `{"error": <code>, "message": <text>}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use procdesk_core::app_definition::AppDefinitionError;
use procdesk_core::related_content::RelatedContentError;
use procdesk_core::task::TaskError;
use procdesk_shared::AppError;

/// Error returned by route handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Creates an error from a status code, machine-readable code and message.
    #[must_use]
    pub fn new(status: u16, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code,
            message: message.into(),
        }
    }

    /// HTTP status of the response.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Generic internal error; the cause is logged but not exposed.
    fn internal(code: &'static str, cause: &str) -> Self {
        error!(error = %cause, code, "Request failed");
        Self::new(500, code, "An internal error occurred")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": self.code,
                "message": self.message
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        match e {
            AppError::Database(ref cause) => Self::internal(e.error_code(), cause),
            AppError::Unauthorized(_) => Self::new(e.status_code(), e.error_code(), e.to_string()),
        }
    }
}

impl From<TaskError> for ApiError {
    fn from(e: TaskError) -> Self {
        match e {
            TaskError::Database(ref cause) => Self::internal(e.error_code(), cause),
            _ => Self::new(e.status_code(), e.error_code(), e.to_string()),
        }
    }
}

impl From<RelatedContentError> for ApiError {
    fn from(e: RelatedContentError) -> Self {
        match e {
            RelatedContentError::Repository(ref cause) => Self::internal(e.error_code(), cause),
            _ => Self::new(e.status_code(), e.error_code(), e.to_string()),
        }
    }
}

impl From<AppDefinitionError> for ApiError {
    fn from(e: AppDefinitionError) -> Self {
        match e {
            AppDefinitionError::Deserialization {
                model_id,
                ref reason,
            } => {
                error!(model_id, reason = %reason, "Error deserializing app {model_id}");
                Self::new(500, e.error_code(), e.to_string())
            }
            AppDefinitionError::Repository(ref cause) => Self::internal(e.error_code(), cause),
        }
    }
}
