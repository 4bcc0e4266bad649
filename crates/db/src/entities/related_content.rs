//! `SeaORM` Entity for related_content table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "related_content")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub mime_type: Option<String>,
    pub task_id: Option<String>,
    pub process_instance_id: Option<String>,
    pub source: Option<String>,
    pub source_id: Option<String>,
    pub field: Option<String>,
    pub related_content: bool,
    pub link: bool,
    pub link_url: Option<String>,
    pub content_available: bool,
    pub content_store_id: Option<String>,
    pub content_size: i64,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
