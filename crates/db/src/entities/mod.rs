//! `SeaORM` entity definitions.

pub mod prelude;

pub mod group_members;
pub mod model_history;
pub mod model_share_info;
pub mod models;
pub mod related_content;
pub mod task_identity_links;
pub mod tasks;
pub mod user_groups;
pub mod users;
