//! Related content types and query shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Related content domain model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedContent {
    /// Unique identifier.
    pub id: i64,
    /// Display name (usually the file name).
    pub name: String,
    /// MIME type.
    pub mime_type: Option<String>,
    /// Task the content belongs to.
    pub task_id: Option<String>,
    /// Process instance the content belongs to.
    pub process_instance_id: Option<String>,
    /// Source system the content was imported from.
    pub source: Option<String>,
    /// Identifier of the content in its source system.
    pub source_id: Option<String>,
    /// Form field the content was uploaded through.
    pub field: Option<String>,
    /// True for content attached directly, false for field-based content.
    pub related_content: bool,
    /// Whether the content is a link rather than stored bytes.
    pub link: bool,
    /// Target URL for link content.
    pub link_url: Option<String>,
    /// Whether the bytes are available in the content store.
    pub content_available: bool,
    /// Identifier in the content store.
    pub content_store_id: Option<String>,
    /// Size in bytes.
    pub content_size: i64,
    /// User who created the content.
    pub created_by: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a related content record.
#[derive(Debug, Clone, Default)]
pub struct NewRelatedContent {
    /// Display name.
    pub name: String,
    /// MIME type.
    pub mime_type: Option<String>,
    /// Task the content belongs to.
    pub task_id: Option<String>,
    /// Process instance the content belongs to.
    pub process_instance_id: Option<String>,
    /// Source system.
    pub source: Option<String>,
    /// Identifier in the source system.
    pub source_id: Option<String>,
    /// Form field.
    pub field: Option<String>,
    /// True for related content, false for field-based content.
    pub related_content: bool,
    /// Link flag.
    pub link: bool,
    /// Link target.
    pub link_url: Option<String>,
    /// Content store identifier.
    pub content_store_id: Option<String>,
    /// Size in bytes.
    pub content_size: i64,
    /// Creator.
    pub created_by: Uuid,
}

/// The paged lookups the content store supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelatedContentQuery {
    /// All content imported from `source` with the given source id.
    BySource {
        /// Source system.
        source: String,
        /// Identifier in the source system.
        source_id: String,
    },
    /// Content attached directly to a task.
    RelatedByTask(String),
    /// Field-based content of a task.
    FieldBasedByTask(String),
    /// Content of a task uploaded through one form field.
    ByTaskAndField {
        /// Task ID.
        task_id: String,
        /// Form field.
        field: String,
    },
    /// Content attached directly to a process instance.
    RelatedByProcessInstance(String),
    /// Field-based content of a process instance.
    FieldBasedByProcessInstance(String),
    /// All content of a process instance.
    AllByProcessInstance(String),
    /// Content of a process instance uploaded through one form field.
    ByProcessInstanceAndField {
        /// Process instance ID.
        process_instance_id: String,
        /// Form field.
        field: String,
    },
}

impl RelatedContentQuery {
    /// Short label used in logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::BySource { .. } => "by_source",
            Self::RelatedByTask(_) => "related_by_task",
            Self::FieldBasedByTask(_) => "field_based_by_task",
            Self::ByTaskAndField { .. } => "by_task_and_field",
            Self::RelatedByProcessInstance(_) => "related_by_process_instance",
            Self::FieldBasedByProcessInstance(_) => "field_based_by_process_instance",
            Self::AllByProcessInstance(_) => "all_by_process_instance",
            Self::ByProcessInstanceAndField { .. } => "by_process_instance_and_field",
        }
    }

    /// Whether a content record is part of this query's result set.
    ///
    /// Mirrors the database filters; used by in-memory stores.
    #[must_use]
    pub fn matches(&self, content: &RelatedContent) -> bool {
        let task = content.task_id.as_deref();
        let process = content.process_instance_id.as_deref();
        let field = content.field.as_deref();

        match self {
            Self::BySource { source, source_id } => {
                content.source.as_deref() == Some(source.as_str())
                    && content.source_id.as_deref() == Some(source_id.as_str())
            }
            Self::RelatedByTask(id) => task == Some(id.as_str()) && content.related_content,
            Self::FieldBasedByTask(id) => task == Some(id.as_str()) && !content.related_content,
            Self::ByTaskAndField { task_id, field: f } => {
                task == Some(task_id.as_str()) && field == Some(f.as_str())
            }
            Self::RelatedByProcessInstance(id) => {
                process == Some(id.as_str()) && content.related_content
            }
            Self::FieldBasedByProcessInstance(id) => {
                process == Some(id.as_str()) && !content.related_content
            }
            Self::AllByProcessInstance(id) => process == Some(id.as_str()),
            Self::ByProcessInstanceAndField {
                process_instance_id,
                field: f,
            } => process == Some(process_instance_id.as_str()) && field == Some(f.as_str()),
        }
    }
}
