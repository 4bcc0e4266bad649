//! Task action routes.
//!
//! All actions are `PUT /tasks/{task_id}/action/{action}`. Only `assign` returns a
//! body; the other actions answer `200 OK` with an empty body.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::put,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::current_user;
use crate::{AppState, error::ApiError, middleware::AuthUser};
use procdesk_core::UserSummary;
use procdesk_core::task::{InvolvedUserRef, Task, TaskError};
use procdesk_db::{TaskRepository, UserRepository};
use procdesk_shared::AppError;

/// Creates the task action routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tasks/{task_id}/action/complete", put(complete_task))
        .route("/tasks/{task_id}/action/assign", put(assign_task))
        .route("/tasks/{task_id}/action/involve", put(involve_user))
        .route("/tasks/{task_id}/action/remove-involved", put(remove_involved_user))
        .route("/tasks/{task_id}/action/claim", put(claim_task))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for assigning a task.
#[derive(Debug, Deserialize)]
pub struct AssignTaskRequest {
    /// ID of the new assignee.
    #[serde(default)]
    pub assignee: Option<Uuid>,
}

/// Request body for involving a user in a task, or removing one.
///
/// The user is identified by ID or, when no ID is given, by email.
#[derive(Debug, Deserialize)]
pub struct InvolveUserRequest {
    /// User ID.
    #[serde(default, alias = "userId")]
    pub user_id: Option<Uuid>,
    /// User email.
    #[serde(default)]
    pub email: Option<String>,
}

/// Task as returned after an assignment.
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    /// Task ID.
    pub id: String,
    /// Task name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Category.
    pub category: Option<String>,
    /// Current assignee.
    pub assignee: Option<UserSummary>,
    /// Owner ID.
    pub owner: Option<Uuid>,
    /// Process instance the task belongs to.
    pub process_instance_id: Option<String>,
    /// Form key.
    pub form_key: Option<String>,
    /// Priority.
    pub priority: i32,
    /// Due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
    /// Completion timestamp.
    pub ended: Option<DateTime<Utc>>,
    /// Users involved as participants.
    pub involved_people: Vec<UserSummary>,
}

impl TaskResponse {
    fn new(task: Task, assignee: Option<UserSummary>, involved_people: Vec<UserSummary>) -> Self {
        Self {
            id: task.id,
            name: task.name,
            description: task.description,
            category: task.category,
            assignee,
            owner: task.owner,
            process_instance_id: task.process_instance_id,
            form_key: task.form_key,
            priority: task.priority,
            due_date: task.due_date,
            created: task.created_at,
            ended: task.completed_at,
            involved_people,
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// PUT `/tasks/{task_id}/action/complete`
async fn complete_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(task_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let user = current_user(&state, &auth).await?;
    TaskRepository::new((*state.db).clone())
        .complete_task(&task_id, &user)
        .await?;

    Ok(StatusCode::OK)
}

/// PUT `/tasks/{task_id}/action/assign`
async fn assign_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(task_id): Path<String>,
    Json(body): Json<AssignTaskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let assignee = body.assignee.ok_or(TaskError::AssigneeRequired)?;
    let user = current_user(&state, &auth).await?;

    let repo = TaskRepository::new((*state.db).clone());
    let task = repo.assign_task(&task_id, &user, Some(assignee)).await?;

    let assignee = match task.assignee {
        Some(id) => UserRepository::new((*state.db).clone())
            .find_summaries(&[id])
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .into_iter()
            .next(),
        None => None,
    };
    let involved = repo.find_involved_users(&task_id).await?;

    info!(task_id = %task_id, assignee = ?task.assignee, "Task assignment returned");
    Ok(Json(TaskResponse::new(task, assignee, involved)))
}

/// PUT `/tasks/{task_id}/action/involve`
async fn involve_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(task_id): Path<String>,
    Json(body): Json<InvolveUserRequest>,
) -> Result<StatusCode, ApiError> {
    let involved = InvolvedUserRef::from_parts(body.user_id, body.email)?;
    let user = current_user(&state, &auth).await?;

    TaskRepository::new((*state.db).clone())
        .involve_user(&task_id, &user, involved)
        .await?;

    Ok(StatusCode::OK)
}

/// PUT `/tasks/{task_id}/action/remove-involved`
async fn remove_involved_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(task_id): Path<String>,
    Json(body): Json<InvolveUserRequest>,
) -> Result<StatusCode, ApiError> {
    let involved = InvolvedUserRef::from_parts(body.user_id, body.email)?;
    let user = current_user(&state, &auth).await?;

    TaskRepository::new((*state.db).clone())
        .remove_involved_user(&task_id, &user, involved)
        .await?;

    Ok(StatusCode::OK)
}

/// PUT `/tasks/{task_id}/action/claim`
async fn claim_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(task_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let user = current_user(&state, &auth).await?;
    TaskRepository::new((*state.db).clone())
        .claim_task(&task_id, &user)
        .await?;

    Ok(StatusCode::OK)
}
