//! Model, model history and app definition types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of artifact a model stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    /// BPMN process model.
    Bpmn,
    /// Form model.
    Form,
    /// App model bundling other models.
    App,
    /// Decision table model.
    DecisionTable,
}

impl ModelType {
    /// Integer code stored in the `model_type` column.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Bpmn => 0,
            Self::Form => 2,
            Self::App => 3,
            Self::DecisionTable => 4,
        }
    }

    /// Parses the integer code stored in the `model_type` column.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Bpmn),
            2 => Some(Self::Form),
            3 => Some(Self::App),
            4 => Some(Self::DecisionTable),
            _ => None,
        }
    }
}

/// The live version of a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    /// Model ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Unique key.
    pub model_key: String,
    /// Description.
    pub description: Option<String>,
    /// Artifact kind.
    pub model_type: ModelType,
    /// Current version number.
    pub version: i32,
    /// Editor JSON.
    pub model_editor_json: String,
    /// Creator.
    pub created_by: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub last_updated_at: DateTime<Utc>,
}

/// A snapshot of a model at one version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelHistory {
    /// History row ID.
    pub id: i64,
    /// ID of the model this snapshot belongs to.
    pub model_id: i64,
    /// Display name at this version.
    pub name: String,
    /// Unique key.
    pub model_key: String,
    /// Description at this version.
    pub description: Option<String>,
    /// Artifact kind.
    pub model_type: ModelType,
    /// Version number of the snapshot.
    pub version: i32,
    /// Editor JSON at this version.
    pub model_editor_json: String,
    /// Creator of the snapshot.
    pub created_by: Uuid,
    /// Snapshot timestamp.
    pub created_at: DateTime<Utc>,
    /// Set once the model was removed.
    pub removal_date: Option<DateTime<Utc>>,
}

/// Read access shared by models and model history records.
pub trait AppModelSource {
    /// ID of the app definition this record describes.
    ///
    /// For history records this is the model ID, not the history row ID.
    fn definition_id(&self) -> i64;
    /// Display name.
    fn name(&self) -> &str;
    /// Description.
    fn description(&self) -> Option<&str>;
    /// Version number.
    fn version(&self) -> i32;
    /// Stored editor JSON.
    fn editor_json(&self) -> &str;
}

impl AppModelSource for Model {
    fn definition_id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn version(&self) -> i32 {
        self.version
    }

    fn editor_json(&self) -> &str {
        &self.model_editor_json
    }
}

impl AppModelSource for ModelHistory {
    fn definition_id(&self) -> i64 {
        self.model_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn version(&self) -> i32 {
        self.version
    }

    fn editor_json(&self) -> &str {
        &self.model_editor_json
    }
}

/// App manifest stored as the editor JSON of an app model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppDefinition {
    /// Models bundled by the app; `null` and absent are both accepted.
    #[serde(default)]
    pub models: Option<Vec<AppModelDefinition>>,
    /// Theme name.
    #[serde(default)]
    pub theme: Option<String>,
    /// Icon name.
    #[serde(default)]
    pub icon: Option<String>,
}

/// Reference to a model inside an app manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppModelDefinition {
    /// Referenced model ID.
    #[serde(default)]
    pub id: Option<i64>,
    /// Model name when the app was saved.
    #[serde(default)]
    pub name: Option<String>,
    /// Model version when the app was saved.
    #[serde(default)]
    pub version: Option<i32>,
    /// Model type code.
    #[serde(default)]
    pub model_type: Option<i32>,
    /// Model description.
    #[serde(default)]
    pub description: Option<String>,
}

/// App definition as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDefinitionRepresentation {
    /// Model ID of the app.
    pub id: i64,
    /// App name.
    pub name: String,
    /// App description.
    pub description: Option<String>,
    /// Version of the app model.
    pub version: i32,
    /// Raw editor JSON.
    pub definition: String,
    /// Theme from the manifest.
    pub theme: Option<String>,
    /// Icon from the manifest.
    pub icon: Option<String>,
    /// IDs of the bundled models; absent when no bundled model carries an ID.
    pub models: Option<Vec<i64>>,
}
