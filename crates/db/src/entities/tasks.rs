//! `SeaORM` Entity for tasks table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub assignee: Option<Uuid>,
    pub owner: Option<Uuid>,
    pub process_instance_id: Option<String>,
    pub form_key: Option<String>,
    pub priority: i32,
    pub due_date: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub completed_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::task_identity_links::Entity")]
    TaskIdentityLinks,
}

impl Related<super::task_identity_links::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaskIdentityLinks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
