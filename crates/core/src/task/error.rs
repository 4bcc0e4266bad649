//! Task error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during task actions.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Task not found.
    #[error("Task {0} not found")]
    TaskNotFound(String),

    /// Task is already completed.
    #[error("Task {0} is already completed")]
    AlreadyCompleted(String),

    /// User may not perform the action on the task.
    #[error("User {user_id} is not permitted to act on task {task_id}")]
    NotPermitted {
        /// Task ID.
        task_id: String,
        /// Acting user.
        user_id: Uuid,
    },

    /// Task is assigned to someone else.
    #[error("Task {task_id} is already claimed by {assignee}")]
    AlreadyClaimed {
        /// Task ID.
        task_id: String,
        /// Current assignee.
        assignee: Uuid,
    },

    /// Assign request without an assignee.
    #[error("Assignee is required")]
    AssigneeRequired,

    /// Involve request without a user id or email.
    #[error("User id or email is required")]
    InvolvedUserRequired,

    /// Referenced user does not exist.
    #[error("User {0} not found")]
    UserNotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl TaskError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::AlreadyCompleted(_) | Self::AssigneeRequired | Self::InvolvedUserRequired => 400,
            Self::NotPermitted { .. } => 403,
            Self::TaskNotFound(_) | Self::UserNotFound(_) => 404,
            Self::AlreadyClaimed { .. } => 409,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TaskNotFound(_) => "TASK_NOT_FOUND",
            Self::AlreadyCompleted(_) => "TASK_ALREADY_COMPLETED",
            Self::NotPermitted { .. } => "NOT_PERMITTED",
            Self::AlreadyClaimed { .. } => "TASK_ALREADY_CLAIMED",
            Self::AssigneeRequired => "ASSIGNEE_REQUIRED",
            Self::InvolvedUserRequired => "INVOLVED_USER_REQUIRED",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}
