//! Core business logic for Procdesk.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Domain types, repository traits, and the rules applied on top of them live here.
//!
//! # Modules
//!
//! - `identity` - The acting user and user summaries
//! - `related_content` - Content attached to tasks and process instances
//! - `app_definition` - Model aggregation into app definitions
//! - `task` - Task action rules (complete, assign, involve, claim)

pub mod app_definition;
pub mod identity;
pub mod related_content;
pub mod task;

pub use identity::{CurrentUser, UserSummary};
