//! Related content repository for database operations.
//!
//! Every paged lookup orders by creation time, then ID, so pages are stable.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use crate::entities::related_content;
use procdesk_core::related_content::{
    NewRelatedContent, RelatedContent, RelatedContentError,
    RelatedContentRepository as RelatedContentRepoTrait, RelatedContentQuery,
};
use procdesk_shared::types::PageRequest;

/// One page of content plus the total number of matching rows.
pub type ContentPage = (Vec<RelatedContent>, u64);

/// Related content repository implementation.
#[derive(Debug, Clone)]
pub struct RelatedContentRepository {
    db: DatabaseConnection,
}

impl RelatedContentRepository {
    /// Create a new related content repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Content imported from a source system with the given source id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_all_related_by_source_and_source_id(
        &self,
        source: &str,
        source_id: &str,
        page: PageRequest,
    ) -> Result<ContentPage, RelatedContentError> {
        let select = related_content::Entity::find()
            .filter(related_content::Column::Source.eq(source))
            .filter(related_content::Column::SourceId.eq(source_id));
        self.fetch(select, page).await
    }

    /// Content attached directly to a task.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_all_related_by_task_id(
        &self,
        task_id: &str,
        page: PageRequest,
    ) -> Result<ContentPage, RelatedContentError> {
        let select = related_content::Entity::find()
            .filter(related_content::Column::TaskId.eq(task_id))
            .filter(related_content::Column::RelatedContent.eq(true));
        self.fetch(select, page).await
    }

    /// Field-based content of a task.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_all_field_based_content_by_task_id(
        &self,
        task_id: &str,
        page: PageRequest,
    ) -> Result<ContentPage, RelatedContentError> {
        let select = related_content::Entity::find()
            .filter(related_content::Column::TaskId.eq(task_id))
            .filter(related_content::Column::RelatedContent.eq(false));
        self.fetch(select, page).await
    }

    /// Content of a task uploaded through one form field.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_all_by_task_id_and_field(
        &self,
        task_id: &str,
        field: &str,
        page: PageRequest,
    ) -> Result<ContentPage, RelatedContentError> {
        let select = related_content::Entity::find()
            .filter(related_content::Column::TaskId.eq(task_id))
            .filter(related_content::Column::Field.eq(field));
        self.fetch(select, page).await
    }

    /// Content attached directly to a process instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_all_related_by_process_instance_id(
        &self,
        process_instance_id: &str,
        page: PageRequest,
    ) -> Result<ContentPage, RelatedContentError> {
        let select = related_content::Entity::find()
            .filter(related_content::Column::ProcessInstanceId.eq(process_instance_id))
            .filter(related_content::Column::RelatedContent.eq(true));
        self.fetch(select, page).await
    }

    /// Field-based content of a process instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_all_field_based_content_by_process_instance_id(
        &self,
        process_instance_id: &str,
        page: PageRequest,
    ) -> Result<ContentPage, RelatedContentError> {
        let select = related_content::Entity::find()
            .filter(related_content::Column::ProcessInstanceId.eq(process_instance_id))
            .filter(related_content::Column::RelatedContent.eq(false));
        self.fetch(select, page).await
    }

    /// All content of a process instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_all_content_by_process_instance_id(
        &self,
        process_instance_id: &str,
        page: PageRequest,
    ) -> Result<ContentPage, RelatedContentError> {
        let select = related_content::Entity::find()
            .filter(related_content::Column::ProcessInstanceId.eq(process_instance_id));
        self.fetch(select, page).await
    }

    /// Content of a process instance uploaded through one form field.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_all_by_process_instance_id_and_field(
        &self,
        process_instance_id: &str,
        field: &str,
        page: PageRequest,
    ) -> Result<ContentPage, RelatedContentError> {
        let select = related_content::Entity::find()
            .filter(related_content::Column::ProcessInstanceId.eq(process_instance_id))
            .filter(related_content::Column::Field.eq(field));
        self.fetch(select, page).await
    }

    async fn fetch(
        &self,
        select: Select<related_content::Entity>,
        page: PageRequest,
    ) -> Result<ContentPage, RelatedContentError> {
        let page = page.normalized();
        let paginator = select
            .order_by_asc(related_content::Column::CreatedAt)
            .order_by_asc(related_content::Column::Id)
            .paginate(&self.db, page.limit());

        let total = paginator
            .num_items()
            .await
            .map_err(|e| RelatedContentError::Repository(e.to_string()))?;
        let models = paginator
            .fetch_page(page.page_index())
            .await
            .map_err(|e| RelatedContentError::Repository(e.to_string()))?;

        Ok((models.into_iter().map(to_domain).collect(), total))
    }
}

impl RelatedContentRepoTrait for RelatedContentRepository {
    async fn create(&self, input: NewRelatedContent) -> Result<RelatedContent, RelatedContentError> {
        // Bytes are only available once a store id was assigned
        let content_available = input.content_store_id.is_some();
        let active_model = related_content::ActiveModel {
            name: Set(input.name),
            mime_type: Set(input.mime_type),
            task_id: Set(input.task_id),
            process_instance_id: Set(input.process_instance_id),
            source: Set(input.source),
            source_id: Set(input.source_id),
            field: Set(input.field),
            related_content: Set(input.related_content),
            link: Set(input.link),
            link_url: Set(input.link_url),
            content_available: Set(content_available),
            content_store_id: Set(input.content_store_id),
            content_size: Set(input.content_size),
            created_by: Set(input.created_by),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| RelatedContentError::Repository(e.to_string()))?;

        Ok(to_domain(model))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<RelatedContent>, RelatedContentError> {
        let model = related_content::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| RelatedContentError::Repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn find_page(
        &self,
        query: &RelatedContentQuery,
        page: PageRequest,
    ) -> Result<ContentPage, RelatedContentError> {
        match query {
            RelatedContentQuery::BySource { source, source_id } => {
                self.find_all_related_by_source_and_source_id(source, source_id, page)
                    .await
            }
            RelatedContentQuery::RelatedByTask(task_id) => {
                self.find_all_related_by_task_id(task_id, page).await
            }
            RelatedContentQuery::FieldBasedByTask(task_id) => {
                self.find_all_field_based_content_by_task_id(task_id, page)
                    .await
            }
            RelatedContentQuery::ByTaskAndField { task_id, field } => {
                self.find_all_by_task_id_and_field(task_id, field, page)
                    .await
            }
            RelatedContentQuery::RelatedByProcessInstance(id) => {
                self.find_all_related_by_process_instance_id(id, page).await
            }
            RelatedContentQuery::FieldBasedByProcessInstance(id) => {
                self.find_all_field_based_content_by_process_instance_id(id, page)
                    .await
            }
            RelatedContentQuery::AllByProcessInstance(id) => {
                self.find_all_content_by_process_instance_id(id, page).await
            }
            RelatedContentQuery::ByProcessInstanceAndField {
                process_instance_id,
                field,
            } => {
                self.find_all_by_process_instance_id_and_field(process_instance_id, field, page)
                    .await
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, RelatedContentError> {
        let result = related_content::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| RelatedContentError::Repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    async fn delete_all_content_by_process_instance_id(
        &self,
        process_instance_id: &str,
    ) -> Result<u64, RelatedContentError> {
        let result = related_content::Entity::delete_many()
            .filter(related_content::Column::ProcessInstanceId.eq(process_instance_id))
            .exec(&self.db)
            .await
            .map_err(|e| RelatedContentError::Repository(e.to_string()))?;

        tracing::debug!(
            process_instance_id,
            deleted = result.rows_affected,
            "Deleted process instance content"
        );

        Ok(result.rows_affected)
    }

    async fn get_total_content_size_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<i64>, RelatedContentError> {
        // SUM over BIGINT is NUMERIC in Postgres; cast back so it decodes as i64
        let total: Option<Option<i64>> = related_content::Entity::find()
            .filter(related_content::Column::CreatedBy.eq(user_id))
            .select_only()
            .column_as(
                Expr::cust("CAST(SUM(related_content.content_size) AS BIGINT)"),
                "total",
            )
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(|e| RelatedContentError::Repository(e.to_string()))?;

        Ok(total.flatten())
    }
}

/// Convert a database row to the domain model.
fn to_domain(model: related_content::Model) -> RelatedContent {
    RelatedContent {
        id: model.id,
        name: model.name,
        mime_type: model.mime_type,
        task_id: model.task_id,
        process_instance_id: model.process_instance_id,
        source: model.source,
        source_id: model.source_id,
        field: model.field,
        related_content: model.related_content,
        link: model.link,
        link_url: model.link_url,
        content_available: model.content_available,
        content_store_id: model.content_store_id,
        content_size: model.content_size,
        created_by: model.created_by,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
