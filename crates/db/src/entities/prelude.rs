//! Entity re-exports.

pub use super::group_members::Entity as GroupMembers;
pub use super::model_history::Entity as ModelHistory;
pub use super::model_share_info::Entity as ModelShareInfo;
pub use super::models::Entity as Models;
pub use super::related_content::Entity as RelatedContent;
pub use super::task_identity_links::Entity as TaskIdentityLinks;
pub use super::tasks::Entity as Tasks;
pub use super::user_groups::Entity as UserGroups;
pub use super::users::Entity as Users;
