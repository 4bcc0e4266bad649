//! Task repository for task actions.
//!
//! Each action loads the task and its identity links inside one database
//! transaction, validates it with `TaskActionService`, then persists the change.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use procdesk_core::task::{
    IdentityLink, IdentityLinkType, InvolvedUserRef, Task, TaskAction, TaskActionService,
    TaskError,
};
use procdesk_core::{CurrentUser, UserSummary};

use crate::entities::{task_identity_links, tasks, users};

use super::user::to_summary;

/// Input for creating a task.
#[derive(Debug, Clone, Default)]
pub struct CreateTaskInput {
    /// Task ID as assigned by the process engine.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Category.
    pub category: Option<String>,
    /// Initial assignee.
    pub assignee: Option<Uuid>,
    /// Owner.
    pub owner: Option<Uuid>,
    /// Process instance the task belongs to.
    pub process_instance_id: Option<String>,
    /// Form key.
    pub form_key: Option<String>,
    /// Priority.
    pub priority: i32,
}

/// Task repository for task actions.
#[derive(Debug, Clone)]
pub struct TaskRepository {
    db: DatabaseConnection,
}

impl TaskRepository {
    /// Creates a new task repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a task.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create_task(&self, input: CreateTaskInput) -> Result<Task, TaskError> {
        let model = tasks::ActiveModel {
            id: Set(input.id),
            name: Set(input.name),
            description: Set(input.description),
            category: Set(input.category),
            assignee: Set(input.assignee),
            owner: Set(input.owner),
            process_instance_id: Set(input.process_instance_id),
            form_key: Set(input.form_key),
            priority: Set(input.priority),
            due_date: Set(None),
            created_at: Set(Utc::now().into()),
            completed_at: Set(None),
        }
        .insert(&self.db)
        .await
        .map_err(|e| TaskError::Database(e.to_string()))?;

        Ok(to_domain(model))
    }

    /// Adds an identity link to a task.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn add_identity_link(
        &self,
        task_id: &str,
        link: &IdentityLink,
    ) -> Result<(), TaskError> {
        insert_link(&self.db, task_id, link).await
    }

    /// Finds a task by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_task(&self, task_id: &str) -> Result<Option<Task>, TaskError> {
        let model = tasks::Entity::find_by_id(task_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| TaskError::Database(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    /// Users involved in a task as participants, ordered by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_involved_users(&self, task_id: &str) -> Result<Vec<UserSummary>, TaskError> {
        let user_ids: Vec<Option<Uuid>> = task_identity_links::Entity::find()
            .filter(task_identity_links::Column::TaskId.eq(task_id))
            .filter(
                task_identity_links::Column::LinkType.eq(IdentityLinkType::Participant.as_str()),
            )
            .select_only()
            .column(task_identity_links::Column::UserId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| TaskError::Database(e.to_string()))?;

        let user_ids: Vec<Uuid> = user_ids.into_iter().flatten().collect();
        if user_ids.is_empty() {
            return Ok(vec![]);
        }

        let models = users::Entity::find()
            .filter(users::Column::Id.is_in(user_ids))
            .order_by_asc(users::Column::Email)
            .all(&self.db)
            .await
            .map_err(|e| TaskError::Database(e.to_string()))?;

        Ok(models.into_iter().map(to_summary).collect())
    }

    /// Completes a task.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Task is not found or already completed
    /// - User is neither the assignee nor the owner
    /// - Database operation fails
    pub async fn complete_task(&self, task_id: &str, user: &CurrentUser) -> Result<Task, TaskError> {
        let txn = self.begin().await?;
        let task = lock_task(&txn, task_id).await?;

        let action = TaskActionService::complete(&task, user)?;
        let updated = apply(&txn, task, &action).await?;

        commit(txn).await?;
        tracing::info!(task_id, user_id = %user.id, "Task completed");
        Ok(updated)
    }

    /// Assigns a task to another user.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No assignee is given
    /// - Task is not found or already completed
    /// - User has no access to the task
    /// - Assignee does not exist
    /// - Database operation fails
    pub async fn assign_task(
        &self,
        task_id: &str,
        user: &CurrentUser,
        assignee: Option<Uuid>,
    ) -> Result<Task, TaskError> {
        let txn = self.begin().await?;
        let task = lock_task(&txn, task_id).await?;
        let links = load_links(&txn, task_id).await?;

        let action = TaskActionService::assign(&task, &links, user, assignee)?;
        if let TaskAction::Assign { assignee } = action {
            ensure_user_exists(&txn, assignee).await?;
        }
        let updated = apply(&txn, task, &action).await?;

        commit(txn).await?;
        tracing::info!(task_id, user_id = %user.id, assignee = ?updated.assignee, "Task assigned");
        Ok(updated)
    }

    /// Involves a user in a task. Involving an already involved user is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Task is not found or already completed
    /// - User has no access to the task
    /// - The involved user does not exist
    /// - Database operation fails
    pub async fn involve_user(
        &self,
        task_id: &str,
        user: &CurrentUser,
        involved: InvolvedUserRef,
    ) -> Result<(), TaskError> {
        let txn = self.begin().await?;
        let task = lock_task(&txn, task_id).await?;
        let links = load_links(&txn, task_id).await?;
        let involved_id = resolve_user(&txn, &involved).await?;

        let action = TaskActionService::involve(&task, &links, user, involved_id)?;
        apply(&txn, task, &action).await?;

        commit(txn).await?;
        tracing::info!(task_id, user_id = %user.id, involved = %involved_id, "User involved");
        Ok(())
    }

    /// Removes an involved user from a task.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Task is not found or already completed
    /// - User has no access to the task
    /// - The involved user does not exist
    /// - Database operation fails
    pub async fn remove_involved_user(
        &self,
        task_id: &str,
        user: &CurrentUser,
        involved: InvolvedUserRef,
    ) -> Result<(), TaskError> {
        let txn = self.begin().await?;
        let task = lock_task(&txn, task_id).await?;
        let links = load_links(&txn, task_id).await?;
        let involved_id = resolve_user(&txn, &involved).await?;

        let action = TaskActionService::remove_involved(&task, &links, user, involved_id)?;
        apply(&txn, task, &action).await?;

        commit(txn).await?;
        tracing::info!(task_id, user_id = %user.id, involved = %involved_id, "Involved user removed");
        Ok(())
    }

    /// Claims a task for the acting user.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Task is not found or already completed
    /// - User has no access to the task
    /// - Task is assigned to someone else
    /// - Database operation fails
    pub async fn claim_task(&self, task_id: &str, user: &CurrentUser) -> Result<Task, TaskError> {
        let txn = self.begin().await?;
        let task = lock_task(&txn, task_id).await?;
        let links = load_links(&txn, task_id).await?;

        let action = TaskActionService::claim(&task, &links, user)?;
        let updated = apply(&txn, task, &action).await?;

        commit(txn).await?;
        tracing::info!(task_id, user_id = %user.id, "Task claimed");
        Ok(updated)
    }

    async fn begin(&self) -> Result<DatabaseTransaction, TaskError> {
        self.db
            .begin()
            .await
            .map_err(|e| TaskError::Database(e.to_string()))
    }
}

async fn commit(txn: DatabaseTransaction) -> Result<(), TaskError> {
    txn.commit()
        .await
        .map_err(|e| TaskError::Database(e.to_string()))
}

/// Loads a task with a row lock held until the transaction ends.
async fn lock_task(txn: &DatabaseTransaction, task_id: &str) -> Result<Task, TaskError> {
    tasks::Entity::find_by_id(task_id.to_string())
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(|e| TaskError::Database(e.to_string()))?
        .map(to_domain)
        .ok_or_else(|| TaskError::TaskNotFound(task_id.to_string()))
}

async fn load_links<C>(db: &C, task_id: &str) -> Result<Vec<IdentityLink>, TaskError>
where
    C: sea_orm::ConnectionTrait,
{
    let models = task_identity_links::Entity::find()
        .filter(task_identity_links::Column::TaskId.eq(task_id))
        .order_by_asc(task_identity_links::Column::Id)
        .all(db)
        .await
        .map_err(|e| TaskError::Database(e.to_string()))?;

    Ok(models
        .into_iter()
        .filter_map(|m| {
            let link_type = IdentityLinkType::parse(&m.link_type)?;
            Some(IdentityLink {
                link_type,
                user_id: m.user_id,
                group_id: m.group_id,
            })
        })
        .collect())
}

async fn insert_link<C>(db: &C, task_id: &str, link: &IdentityLink) -> Result<(), TaskError>
where
    C: sea_orm::ConnectionTrait,
{
    task_identity_links::ActiveModel {
        task_id: Set(task_id.to_string()),
        link_type: Set(link.link_type.as_str().to_string()),
        user_id: Set(link.user_id),
        group_id: Set(link.group_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| TaskError::Database(e.to_string()))?;
    Ok(())
}

async fn ensure_user_exists(txn: &DatabaseTransaction, user_id: Uuid) -> Result<(), TaskError> {
    users::Entity::find_by_id(user_id)
        .one(txn)
        .await
        .map_err(|e| TaskError::Database(e.to_string()))?
        .map(|_| ())
        .ok_or_else(|| TaskError::UserNotFound(user_id.to_string()))
}

async fn resolve_user(
    txn: &DatabaseTransaction,
    involved: &InvolvedUserRef,
) -> Result<Uuid, TaskError> {
    match involved {
        InvolvedUserRef::Id(id) => {
            ensure_user_exists(txn, *id).await?;
            Ok(*id)
        }
        InvolvedUserRef::Email(email) => users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .one(txn)
            .await
            .map_err(|e| TaskError::Database(e.to_string()))?
            .map(|u| u.id)
            .ok_or_else(|| TaskError::UserNotFound(email.clone())),
    }
}

/// Persists a validated action and returns the task as it is afterwards.
async fn apply(
    txn: &DatabaseTransaction,
    task: Task,
    action: &TaskAction,
) -> Result<Task, TaskError> {
    match *action {
        TaskAction::Complete { completed_at, .. } => {
            update_task(txn, &task.id, |active| {
                active.completed_at = Set(Some(completed_at.into()));
            })
            .await
        }
        TaskAction::Assign { assignee } | TaskAction::Claim { assignee } => {
            update_task(txn, &task.id, |active| {
                active.assignee = Set(Some(assignee));
            })
            .await
        }
        TaskAction::Involve { user_id } => {
            let existing = task_identity_links::Entity::find()
                .filter(task_identity_links::Column::TaskId.eq(task.id.as_str()))
                .filter(task_identity_links::Column::UserId.eq(user_id))
                .filter(
                    task_identity_links::Column::LinkType
                        .eq(IdentityLinkType::Participant.as_str()),
                )
                .one(txn)
                .await
                .map_err(|e| TaskError::Database(e.to_string()))?;

            if existing.is_none() {
                insert_link(txn, &task.id, &IdentityLink::participant(user_id)).await?;
            }
            Ok(task)
        }
        TaskAction::RemoveInvolved { user_id } => {
            task_identity_links::Entity::delete_many()
                .filter(task_identity_links::Column::TaskId.eq(task.id.as_str()))
                .filter(task_identity_links::Column::UserId.eq(user_id))
                .filter(
                    task_identity_links::Column::LinkType
                        .eq(IdentityLinkType::Participant.as_str()),
                )
                .exec(txn)
                .await
                .map_err(|e| TaskError::Database(e.to_string()))?;
            Ok(task)
        }
    }
}

async fn update_task(
    txn: &DatabaseTransaction,
    task_id: &str,
    change: impl FnOnce(&mut tasks::ActiveModel),
) -> Result<Task, TaskError> {
    let model = tasks::Entity::find_by_id(task_id.to_string())
        .one(txn)
        .await
        .map_err(|e| TaskError::Database(e.to_string()))?
        .ok_or_else(|| TaskError::TaskNotFound(task_id.to_string()))?;

    let mut active: tasks::ActiveModel = model.into();
    change(&mut active);

    let updated = active
        .update(txn)
        .await
        .map_err(|e| TaskError::Database(e.to_string()))?;

    Ok(to_domain(updated))
}

/// Convert a database row to the domain model.
fn to_domain(model: tasks::Model) -> Task {
    Task {
        id: model.id,
        name: model.name,
        description: model.description,
        category: model.category,
        assignee: model.assignee,
        owner: model.owner,
        process_instance_id: model.process_instance_id,
        form_key: model.form_key,
        priority: model.priority,
        due_date: model.due_date.map(|d| d.with_timezone(&Utc)),
        created_at: model.created_at.with_timezone(&Utc),
        completed_at: model.completed_at.map(|d| d.with_timezone(&Utc)),
    }
}
