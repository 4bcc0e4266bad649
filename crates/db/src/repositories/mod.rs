//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod model;
pub mod related_content;
pub mod task;
pub mod user;

pub use model::{CreateModelInput, ModelRepository};
pub use related_content::{ContentPage, RelatedContentRepository};
pub use task::{CreateTaskInput, TaskRepository};
pub use user::UserRepository;
