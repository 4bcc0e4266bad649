//! App definitions built from stored app models.
//!
//! An app model stores its editor JSON, a manifest carrying the theme, the icon and
//! the models the app bundles. This module provides:
//! - Model and model history domain types
//! - `ModelIndex`, the per-model-id reconciliation used when merging result sets
//! - `AppDefinitionService`, which aggregates owned and shared models and projects
//!   them into `AppDefinitionRepresentation`s
//!
//! # Merge rules
//!
//! - Current app definitions: owned models first, then models shared with the user.
//!   An id already present is never replaced.
//! - Deployable app definitions: history records of owned models, then history
//!   records shared with the user or the user's groups. An id already present is
//!   replaced only by a strictly greater version.

mod error;
mod index;
mod service;
mod types;

#[cfg(test)]
mod index_props;

pub use error::AppDefinitionError;
pub use index::ModelIndex;
pub use service::{AppDefinitionService, ModelRepository, create_app_definition};
pub use types::{
    AppDefinition, AppDefinitionRepresentation, AppModelDefinition, AppModelSource, Model,
    ModelHistory, ModelType,
};
