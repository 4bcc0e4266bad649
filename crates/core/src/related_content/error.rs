//! Related content error types.

use thiserror::Error;
use uuid::Uuid;

/// Related content operation errors.
#[derive(Debug, Error)]
pub enum RelatedContentError {
    /// Content not found.
    #[error("related content not found: {0}")]
    NotFound(i64),

    /// Only the creator may modify the content.
    #[error("user {user_id} is not the creator of content {content_id}")]
    NotCreator {
        /// Content ID.
        content_id: i64,
        /// User who attempted the operation.
        user_id: Uuid,
    },

    /// Input rejected.
    #[error("invalid content: {0}")]
    Validation(String),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl RelatedContentError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::NotCreator { .. } => 403,
            Self::Validation(_) => 400,
            Self::Repository(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "CONTENT_NOT_FOUND",
            Self::NotCreator { .. } => "NOT_CONTENT_CREATOR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Repository(_) => "DATABASE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(RelatedContentError::NotFound(1).status_code(), 404);
        assert_eq!(
            RelatedContentError::NotCreator {
                content_id: 1,
                user_id: Uuid::nil()
            }
            .status_code(),
            403
        );
        assert_eq!(RelatedContentError::validation("x").status_code(), 400);
        assert_eq!(RelatedContentError::repository("x").status_code(), 500);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            RelatedContentError::NotFound(42).to_string(),
            "related content not found: 42"
        );
        assert_eq!(
            RelatedContentError::NotFound(42).error_code(),
            "CONTENT_NOT_FOUND"
        );
    }
}
