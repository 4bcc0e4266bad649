//! Task action rules for Procdesk.
//!
//! The workflow engine owns task execution; this module only decides whether a
//! user may act on a task and what the action changes.
//!
//! # Modules
//!
//! - `types` - Task, identity link and action types
//! - `error` - Task-specific error types
//! - `service` - Permission checks and action validation

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::TaskError;
pub use service::TaskActionService;
pub use types::{IdentityLink, IdentityLinkType, InvolvedUserRef, Task, TaskAction};
