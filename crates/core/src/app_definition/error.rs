//! App definition error types.

use thiserror::Error;

/// Errors raised while building app definitions.
#[derive(Debug, Error)]
pub enum AppDefinitionError {
    /// The stored editor JSON of a model is not a valid app definition.
    #[error("Could not deserialize app definition")]
    Deserialization {
        /// ID of the model whose JSON failed to parse.
        model_id: i64,
        /// Parser message.
        reason: String,
    },

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl AppDefinitionError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        500
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Deserialization { .. } => "INTERNAL_ERROR",
            Self::Repository(_) => "DATABASE_ERROR",
        }
    }
}
