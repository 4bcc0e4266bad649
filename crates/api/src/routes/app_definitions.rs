//! App definition routes.

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use tracing::debug;

use super::current_user;
use crate::{AppState, error::ApiError, middleware::AuthUser};
use procdesk_core::app_definition::{AppDefinitionRepresentation, AppDefinitionService};
use procdesk_db::ModelRepository;

/// Creates the app definition routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/app-definitions", get(list_app_definitions))
        .route("/app-definitions/deployable", get(list_deployable_app_definitions))
}

/// Unpaged result list envelope.
#[derive(Debug, Serialize)]
pub struct ResultListResponse<T> {
    /// Number of items in `data`.
    pub size: usize,
    /// Total number of items.
    pub total: usize,
    /// Index of the first item.
    pub start: usize,
    /// The items.
    pub data: Vec<T>,
}

impl<T> ResultListResponse<T> {
    /// Wraps a complete list.
    #[must_use]
    pub fn new(data: Vec<T>) -> Self {
        Self {
            size: data.len(),
            total: data.len(),
            start: 0,
            data,
        }
    }
}

fn service(state: &AppState) -> AppDefinitionService<ModelRepository> {
    AppDefinitionService::new(Arc::new(ModelRepository::new((*state.db).clone())))
}

/// GET `/app-definitions`
async fn list_app_definitions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ResultListResponse<AppDefinitionRepresentation>>, ApiError> {
    let user = current_user(&state, &auth).await?;
    let definitions = service(&state).get_app_definitions(&user).await?;

    debug!(user_id = %user.id, count = definitions.len(), "Listed app definitions");
    Ok(Json(ResultListResponse::new(definitions)))
}

/// GET `/app-definitions/deployable`
async fn list_deployable_app_definitions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ResultListResponse<AppDefinitionRepresentation>>, ApiError> {
    let user = current_user(&state, &auth).await?;
    let definitions = service(&state).get_deployable_app_definitions(&user).await?;

    debug!(
        user_id = %user.id,
        groups = user.group_ids.len(),
        count = definitions.len(),
        "Listed deployable app definitions"
    );
    Ok(Json(ResultListResponse::new(definitions)))
}
