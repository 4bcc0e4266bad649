//! Related content routes.
//!
//! Lists content of tasks and process instances, and manages single content
//! records. Creating and deleting content only touches metadata; bytes live in the
//! content store referenced by `content_store_id`.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AuthUser};
use procdesk_core::related_content::{
    NewRelatedContent, RelatedContent, RelatedContentQuery, RelatedContentService,
};
use procdesk_db::RelatedContentRepository;
use procdesk_shared::types::{PageRequest, PageResponse};

/// Creates the related content routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tasks/{task_id}/content", get(list_task_content))
        .route("/tasks/{task_id}/field-content", get(list_task_field_content))
        .route(
            "/process-instances/{process_instance_id}/content",
            get(list_process_content),
        )
        .route(
            "/process-instances/{process_instance_id}/field-content",
            get(list_process_field_content),
        )
        .route(
            "/process-instances/{process_instance_id}/all-content",
            get(list_all_process_content),
        )
        .route("/content", get(list_content_by_source).post(create_content))
        .route("/content/usage", get(content_usage))
        .route("/content/{content_id}", get(get_content).delete(delete_content))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Paging and field filter query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ContentListQuery {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
    /// Restrict to content uploaded through this form field.
    pub field: Option<String>,
}

impl ContentListQuery {
    fn page_request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest::new(
            self.page.unwrap_or(defaults.page),
            self.per_page.unwrap_or(defaults.per_page),
        )
    }
}

/// Query parameters for looking up content by its source system.
#[derive(Debug, Deserialize)]
pub struct SourceQuery {
    /// Source system.
    pub source: String,
    /// Identifier in the source system.
    pub source_id: String,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Request body for creating a content record.
#[derive(Debug, Deserialize)]
pub struct CreateContentRequest {
    /// Display name.
    pub name: String,
    /// MIME type.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Task the content belongs to.
    #[serde(default)]
    pub task_id: Option<String>,
    /// Process instance the content belongs to.
    #[serde(default)]
    pub process_instance_id: Option<String>,
    /// Source system.
    #[serde(default)]
    pub source: Option<String>,
    /// Identifier in the source system.
    #[serde(default)]
    pub source_id: Option<String>,
    /// Form field; content with a field is field-based content.
    #[serde(default)]
    pub field: Option<String>,
    /// Link flag.
    #[serde(default)]
    pub link: bool,
    /// Link target.
    #[serde(default)]
    pub link_url: Option<String>,
    /// Content store identifier.
    #[serde(default)]
    pub content_store_id: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub content_size: i64,
}

impl CreateContentRequest {
    fn into_input(self, created_by: Uuid) -> NewRelatedContent {
        NewRelatedContent {
            related_content: self.field.is_none(),
            name: self.name,
            mime_type: self.mime_type,
            task_id: self.task_id,
            process_instance_id: self.process_instance_id,
            source: self.source,
            source_id: self.source_id,
            field: self.field,
            link: self.link,
            link_url: self.link_url,
            content_store_id: self.content_store_id,
            content_size: self.content_size,
            created_by,
        }
    }
}

/// Content storage used by a user.
#[derive(Debug, Serialize)]
pub struct ContentUsageResponse {
    /// User ID.
    pub user_id: Uuid,
    /// Total size in bytes of the content the user created.
    pub total_size: i64,
}

type ContentService = RelatedContentService<RelatedContentRepository>;

fn service(state: &AppState) -> ContentService {
    RelatedContentService::new(Arc::new(RelatedContentRepository::new((*state.db).clone())))
}

async fn list(
    state: &AppState,
    query: RelatedContentQuery,
    page: PageRequest,
) -> Result<Json<PageResponse<RelatedContent>>, ApiError> {
    let result = service(state).list(&query, page).await?;
    tracing::debug!(
        query = query.label(),
        total = result.meta.total,
        "Listed related content"
    );
    Ok(Json(result))
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/tasks/{task_id}/content`
async fn list_task_content(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(task_id): Path<String>,
    Query(query): Query<ContentListQuery>,
) -> Result<Json<PageResponse<RelatedContent>>, ApiError> {
    list(&state, RelatedContentQuery::RelatedByTask(task_id), query.page_request()).await
}

/// GET `/tasks/{task_id}/field-content`
async fn list_task_field_content(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(task_id): Path<String>,
    Query(query): Query<ContentListQuery>,
) -> Result<Json<PageResponse<RelatedContent>>, ApiError> {
    let page = query.page_request();
    let content_query = match query.field {
        Some(field) => RelatedContentQuery::ByTaskAndField { task_id, field },
        None => RelatedContentQuery::FieldBasedByTask(task_id),
    };
    list(&state, content_query, page).await
}

/// GET `/process-instances/{process_instance_id}/content`
async fn list_process_content(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(process_instance_id): Path<String>,
    Query(query): Query<ContentListQuery>,
) -> Result<Json<PageResponse<RelatedContent>>, ApiError> {
    list(
        &state,
        RelatedContentQuery::RelatedByProcessInstance(process_instance_id),
        query.page_request(),
    )
    .await
}

/// GET `/process-instances/{process_instance_id}/field-content`
async fn list_process_field_content(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(process_instance_id): Path<String>,
    Query(query): Query<ContentListQuery>,
) -> Result<Json<PageResponse<RelatedContent>>, ApiError> {
    let page = query.page_request();
    let content_query = match query.field {
        Some(field) => RelatedContentQuery::ByProcessInstanceAndField {
            process_instance_id,
            field,
        },
        None => RelatedContentQuery::FieldBasedByProcessInstance(process_instance_id),
    };
    list(&state, content_query, page).await
}

/// GET `/process-instances/{process_instance_id}/all-content`
async fn list_all_process_content(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(process_instance_id): Path<String>,
    Query(query): Query<ContentListQuery>,
) -> Result<Json<PageResponse<RelatedContent>>, ApiError> {
    list(
        &state,
        RelatedContentQuery::AllByProcessInstance(process_instance_id),
        query.page_request(),
    )
    .await
}

/// GET `/content?source=..&source_id=..`
async fn list_content_by_source(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<SourceQuery>,
) -> Result<Json<PageResponse<RelatedContent>>, ApiError> {
    let defaults = PageRequest::default();
    let page = PageRequest::new(
        query.page.unwrap_or(defaults.page),
        query.per_page.unwrap_or(defaults.per_page),
    );
    list(
        &state,
        RelatedContentQuery::BySource {
            source: query.source,
            source_id: query.source_id,
        },
        page,
    )
    .await
}

/// POST `/content`
async fn create_content(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateContentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = service(&state)
        .attach(body.into_input(auth.user_id()))
        .await?;

    info!(
        content_id = content.id,
        user_id = %auth.user_id(),
        related = content.related_content,
        "Content created"
    );
    Ok((StatusCode::CREATED, Json(content)))
}

/// GET `/content/{content_id}`
async fn get_content(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(content_id): Path<i64>,
) -> Result<Json<RelatedContent>, ApiError> {
    Ok(Json(service(&state).get(content_id).await?))
}

/// DELETE `/content/{content_id}`
async fn delete_content(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(content_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    service(&state).delete(content_id, auth.user_id()).await?;

    info!(content_id, user_id = %auth.user_id(), "Content deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/content/usage`
async fn content_usage(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ContentUsageResponse>, ApiError> {
    let total_size = service(&state).usage(auth.user_id()).await?;
    Ok(Json(ContentUsageResponse {
        user_id: auth.user_id(),
        total_size,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, header::AUTHORIZATION, header::CONTENT_TYPE},
        middleware::from_fn_with_state,
    };
    use http_body_util::BodyExt;
    use procdesk_shared::{JwtConfig, JwtService};
    use rstest::rstest;
    use sea_orm::DatabaseConnection;
    use tower::ServiceExt;

    use crate::middleware::auth_middleware;

    fn create_test_state() -> AppState {
        AppState {
            db: Arc::new(DatabaseConnection::Disconnected),
            jwt_service: Arc::new(JwtService::new(JwtConfig::default())),
        }
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .merge(routes())
            .layer(from_fn_with_state(state.clone(), auth_middleware))
            .with_state(state)
    }

    #[rstest]
    #[case(None, None, 1, 20)]
    #[case(Some(3), Some(10), 3, 10)]
    #[case(Some(0), Some(1000), 1, 100)]
    fn test_page_request_from_query(
        #[case] page: Option<u32>,
        #[case] per_page: Option<u32>,
        #[case] expected_page: u32,
        #[case] expected_per_page: u32,
    ) {
        let query = ContentListQuery {
            page,
            per_page,
            field: None,
        };
        let request = query.page_request();

        assert_eq!(request.page, expected_page);
        assert_eq!(request.per_page, expected_per_page);
    }

    #[test]
    fn test_field_decides_related_flag() {
        let creator = Uuid::new_v4();
        let attached: CreateContentRequest = serde_json::from_value(serde_json::json!({
            "name": "contract.pdf",
            "task_id": "task-1",
            "content_size": 2048
        }))
        .unwrap();
        let uploaded: CreateContentRequest = serde_json::from_value(serde_json::json!({
            "name": "scan.png",
            "task_id": "task-1",
            "field": "idScan"
        }))
        .unwrap();

        let attached = attached.into_input(creator);
        assert!(attached.related_content);
        assert_eq!(attached.created_by, creator);
        assert_eq!(attached.content_size, 2048);

        let uploaded = uploaded.into_input(creator);
        assert!(!uploaded.related_content);
        assert_eq!(uploaded.field.as_deref(), Some("idScan"));
    }

    #[tokio::test]
    async fn test_list_task_content_no_auth() {
        let response = app(create_test_state())
            .oneshot(
                Request::builder()
                    .uri("/tasks/task-1/content")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_content_validation_runs_before_storage() {
        let state = create_test_state();
        let token = state
            .jwt_service
            .generate_access_token(Uuid::new_v4(), "user@example.com")
            .unwrap();

        let response = app(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/content")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name": "orphan.pdf"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_get_content_rejects_non_numeric_id() {
        let state = create_test_state();
        let token = state
            .jwt_service
            .generate_access_token(Uuid::new_v4(), "user@example.com")
            .unwrap();

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/content/abc")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
