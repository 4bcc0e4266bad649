//! User repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::{group_members, user_groups, users};
use procdesk_core::{CurrentUser, UserSummary};

/// User repository for identity lookups.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        email: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<users::Model, DbErr> {
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_string()),
            first_name: Set(first_name.map(str::to_string)),
            last_name: Set(last_name.map(str::to_string)),
            created_at: Set(chrono::Utc::now().into()),
        };

        user.insert(&self.db).await
    }

    /// Creates a group.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create_group(&self, name: &str) -> Result<user_groups::Model, DbErr> {
        let group = user_groups::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };

        group.insert(&self.db).await
    }

    /// Adds a user to a group.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn add_member(&self, group_id: Uuid, user_id: Uuid) -> Result<(), DbErr> {
        group_members::ActiveModel {
            group_id: Set(group_id),
            user_id: Set(user_id),
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }

    /// IDs of the groups a user belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_group_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
        group_members::Entity::find()
            .filter(group_members::Column::UserId.eq(user_id))
            .select_only()
            .column(group_members::Column::GroupId)
            .order_by_asc(group_members::Column::GroupId)
            .into_tuple()
            .all(&self.db)
            .await
    }

    /// Builds the request identity for a user, including group memberships.
    ///
    /// Returns `None` when the user no longer exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn load_current_user(&self, user_id: Uuid) -> Result<Option<CurrentUser>, DbErr> {
        if self.find_by_id(user_id).await?.is_none() {
            return Ok(None);
        }
        let group_ids = self.find_group_ids(user_id).await?;
        Ok(Some(CurrentUser::with_groups(user_id, group_ids)))
    }

    /// Summaries of the given users, ordered by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_summaries(&self, ids: &[Uuid]) -> Result<Vec<UserSummary>, DbErr> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let models = users::Entity::find()
            .filter(users::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(users::Column::Email)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(to_summary).collect())
    }
}

/// Convert a user row to its public summary.
#[must_use]
pub fn to_summary(model: users::Model) -> UserSummary {
    UserSummary {
        id: model.id,
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
    }
}
