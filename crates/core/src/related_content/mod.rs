//! Related content attached to tasks and process instances.
//!
//! Content is either "related content" (attached directly to a task or process
//! instance) or "field-based content" (uploaded through a form field). This module
//! provides:
//! - The query shapes supported by the content store
//! - Validation of new content
//! - Ownership rules for deletion

mod error;
mod service;
mod types;

pub use error::RelatedContentError;
pub use service::{RelatedContentRepository, RelatedContentService};
pub use types::{NewRelatedContent, RelatedContent, RelatedContentQuery};
