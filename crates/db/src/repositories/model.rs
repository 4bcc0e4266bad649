//! Model and model history repository.
//!
//! Share lookups resolve the shared model ids first, then load the records.

use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{model_history, model_share_info, models};
use procdesk_core::app_definition::{
    AppDefinitionError, Model, ModelHistory, ModelRepository as ModelRepoTrait, ModelType,
};

/// Input for storing a new model.
#[derive(Debug, Clone)]
pub struct CreateModelInput {
    /// Display name.
    pub name: String,
    /// Unique key.
    pub model_key: String,
    /// Description.
    pub description: Option<String>,
    /// Artifact kind.
    pub model_type: ModelType,
    /// Editor JSON.
    pub model_editor_json: String,
    /// Creator.
    pub created_by: Uuid,
}

/// Model repository implementation.
#[derive(Debug, Clone)]
pub struct ModelRepository {
    db: DatabaseConnection,
}

impl ModelRepository {
    /// Create a new model repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores version 1 of a model together with its first history record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreateModelInput) -> Result<models::Model, DbErr> {
        let txn = self.db.begin().await?;
        let now = Utc::now().into();
        let model = models::ActiveModel {
            name: Set(input.name),
            model_key: Set(input.model_key),
            description: Set(input.description),
            model_comment: Set(None),
            model_type: Set(input.model_type.code()),
            version: Set(1),
            model_editor_json: Set(input.model_editor_json),
            created_by: Set(input.created_by),
            created_at: Set(now),
            last_updated_by: Set(input.created_by),
            last_updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        snapshot(&txn, &model).await?;
        txn.commit().await?;
        Ok(model)
    }

    /// Replaces the editor JSON of a model, bumping its version and recording history.
    ///
    /// # Errors
    ///
    /// Returns an error if the model does not exist or the update fails.
    pub async fn update_editor_json(
        &self,
        model_id: i64,
        editor_json: String,
        updated_by: Uuid,
    ) -> Result<models::Model, DbErr> {
        let txn = self.db.begin().await?;
        let existing = models::Entity::find_by_id(model_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("model {model_id}")))?;

        let version = existing.version + 1;
        let mut active: models::ActiveModel = existing.into();
        active.model_editor_json = Set(editor_json);
        active.version = Set(version);
        active.last_updated_by = Set(updated_by);
        active.last_updated_at = Set(Utc::now().into());
        let model = active.update(&txn).await?;

        snapshot(&txn, &model).await?;
        txn.commit().await?;
        Ok(model)
    }

    /// Deletes a live model and marks its history as removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn remove(&self, model_id: i64) -> Result<bool, DbErr> {
        let txn = self.db.begin().await?;
        let now: DateTimeWithTimeZone = Utc::now().into();
        model_history::Entity::update_many()
            .col_expr(model_history::Column::RemovalDate, Expr::value(now))
            .filter(model_history::Column::ModelId.eq(model_id))
            .exec(&txn)
            .await?;

        let result = models::Entity::delete_by_id(model_id).exec(&txn).await?;
        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    /// Shares a model with a user or a group.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn share(
        &self,
        model_id: i64,
        user_id: Option<Uuid>,
        group_id: Option<Uuid>,
        shared_by: Uuid,
    ) -> Result<model_share_info::Model, DbErr> {
        model_share_info::ActiveModel {
            model_id: Set(model_id),
            user_id: Set(user_id),
            group_id: Set(group_id),
            permission: Set("read".to_string()),
            shared_by: Set(shared_by),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }

    async fn shared_model_ids(&self, condition: Condition) -> Result<Vec<i64>, AppDefinitionError> {
        model_share_info::Entity::find()
            .filter(condition)
            .select_only()
            .column(model_share_info::Column::ModelId)
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| AppDefinitionError::Repository(e.to_string()))
    }

    async fn history_for_models(
        &self,
        model_ids: Vec<i64>,
        model_type: ModelType,
    ) -> Result<Vec<ModelHistory>, AppDefinitionError> {
        if model_ids.is_empty() {
            return Ok(vec![]);
        }

        let rows = model_history::Entity::find()
            .filter(model_history::Column::ModelId.is_in(model_ids))
            .filter(model_history::Column::ModelType.eq(model_type.code()))
            .filter(model_history::Column::RemovalDate.is_null())
            .order_by_asc(model_history::Column::Name)
            .order_by_asc(model_history::Column::Version)
            .all(&self.db)
            .await
            .map_err(|e| AppDefinitionError::Repository(e.to_string()))?;

        Ok(rows.into_iter().filter_map(history_to_domain).collect())
    }
}

impl ModelRepoTrait for ModelRepository {
    async fn find_models_created_by(
        &self,
        user_id: Uuid,
        model_type: ModelType,
    ) -> Result<Vec<Model>, AppDefinitionError> {
        let rows = models::Entity::find()
            .filter(models::Column::CreatedBy.eq(user_id))
            .filter(models::Column::ModelType.eq(model_type.code()))
            .order_by_asc(models::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| AppDefinitionError::Repository(e.to_string()))?;

        Ok(rows.into_iter().filter_map(model_to_domain).collect())
    }

    async fn find_models_shared_with_user(
        &self,
        user_id: Uuid,
        model_type: ModelType,
    ) -> Result<Vec<Model>, AppDefinitionError> {
        let ids = self
            .shared_model_ids(Condition::all().add(model_share_info::Column::UserId.eq(user_id)))
            .await?;
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let rows = models::Entity::find()
            .filter(models::Column::Id.is_in(ids))
            .filter(models::Column::ModelType.eq(model_type.code()))
            .order_by_asc(models::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| AppDefinitionError::Repository(e.to_string()))?;

        Ok(rows.into_iter().filter_map(model_to_domain).collect())
    }

    async fn find_history_created_by(
        &self,
        user_id: Uuid,
        model_type: ModelType,
    ) -> Result<Vec<ModelHistory>, AppDefinitionError> {
        let rows = model_history::Entity::find()
            .filter(model_history::Column::CreatedBy.eq(user_id))
            .filter(model_history::Column::ModelType.eq(model_type.code()))
            .filter(model_history::Column::RemovalDate.is_null())
            .order_by_asc(model_history::Column::Name)
            .order_by_asc(model_history::Column::Version)
            .all(&self.db)
            .await
            .map_err(|e| AppDefinitionError::Repository(e.to_string()))?;

        Ok(rows.into_iter().filter_map(history_to_domain).collect())
    }

    async fn find_history_shared_with_user(
        &self,
        user_id: Uuid,
        model_type: ModelType,
    ) -> Result<Vec<ModelHistory>, AppDefinitionError> {
        let ids = self
            .shared_model_ids(Condition::all().add(model_share_info::Column::UserId.eq(user_id)))
            .await?;
        self.history_for_models(ids, model_type).await
    }

    async fn find_history_shared_with_user_or_groups(
        &self,
        user_id: Uuid,
        group_ids: &[Uuid],
        model_type: ModelType,
    ) -> Result<Vec<ModelHistory>, AppDefinitionError> {
        let condition = Condition::any()
            .add(model_share_info::Column::UserId.eq(user_id))
            .add(model_share_info::Column::GroupId.is_in(group_ids.iter().copied()));
        let ids = self.shared_model_ids(condition).await?;
        self.history_for_models(ids, model_type).await
    }

    async fn model_exists(&self, model_id: i64) -> Result<bool, AppDefinitionError> {
        let count = models::Entity::find_by_id(model_id)
            .count(&self.db)
            .await
            .map_err(|e| AppDefinitionError::Repository(e.to_string()))?;

        Ok(count > 0)
    }
}

/// Records the current state of a model as a history row.
async fn snapshot<C: ConnectionTrait>(conn: &C, model: &models::Model) -> Result<(), DbErr> {
    model_history::ActiveModel {
        model_id: Set(model.id),
        name: Set(model.name.clone()),
        model_key: Set(model.model_key.clone()),
        description: Set(model.description.clone()),
        model_comment: Set(model.model_comment.clone()),
        model_type: Set(model.model_type),
        version: Set(model.version),
        model_editor_json: Set(model.model_editor_json.clone()),
        created_by: Set(model.created_by),
        created_at: Set(model.last_updated_at),
        last_updated_by: Set(model.last_updated_by),
        last_updated_at: Set(model.last_updated_at),
        removal_date: Set(None),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok(())
}

/// Convert a model row to the domain model.
///
/// Rows with an unknown type code are skipped.
fn model_to_domain(row: models::Model) -> Option<Model> {
    let Some(model_type) = ModelType::from_code(row.model_type) else {
        tracing::warn!(model_id = row.id, code = row.model_type, "Unknown model type");
        return None;
    };

    Some(Model {
        id: row.id,
        name: row.name,
        model_key: row.model_key,
        description: row.description,
        model_type,
        version: row.version,
        model_editor_json: row.model_editor_json,
        created_by: row.created_by,
        created_at: row.created_at.with_timezone(&Utc),
        last_updated_at: row.last_updated_at.with_timezone(&Utc),
    })
}

fn history_to_domain(row: model_history::Model) -> Option<ModelHistory> {
    let Some(model_type) = ModelType::from_code(row.model_type) else {
        tracing::warn!(history_id = row.id, code = row.model_type, "Unknown model type");
        return None;
    };

    Some(ModelHistory {
        id: row.id,
        model_id: row.model_id,
        name: row.name,
        model_key: row.model_key,
        description: row.description,
        model_type,
        version: row.version,
        model_editor_json: row.model_editor_json,
        created_by: row.created_by,
        created_at: row.created_at.with_timezone(&Utc),
        removal_date: row.removal_date.map(|d| d.with_timezone(&Utc)),
    })
}
