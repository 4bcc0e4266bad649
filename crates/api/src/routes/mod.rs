//! API route definitions.

use axum::{Router, middleware};

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::{AuthUser, auth_middleware};
use procdesk_core::CurrentUser;
use procdesk_db::UserRepository;
use procdesk_shared::AppError;

pub mod app_definitions;
pub mod health;
pub mod related_content;
pub mod task_actions;

/// Creates the `/rest` router; every route in it requires authentication.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(task_actions::routes())
        .merge(app_definitions::routes())
        .merge(related_content::routes())
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Resolves the authenticated user and the groups the user belongs to.
pub(crate) async fn current_user(state: &AppState, auth: &AuthUser) -> Result<CurrentUser, ApiError> {
    UserRepository::new((*state.db).clone())
        .load_current_user(auth.user_id())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::Unauthorized("user no longer exists".to_string()).into())
}
