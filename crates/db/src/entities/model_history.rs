//! `SeaORM` Entity for model_history table.
//!
//! History rows outlive the model they snapshot, so `model_id` carries no foreign key.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "model_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub model_id: i64,
    pub name: String,
    pub model_key: String,
    pub description: Option<String>,
    pub model_comment: Option<String>,
    pub model_type: i32,
    pub version: i32,
    #[sea_orm(column_type = "Text")]
    pub model_editor_json: String,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub last_updated_by: Uuid,
    pub last_updated_at: DateTimeWithTimeZone,
    pub removal_date: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
