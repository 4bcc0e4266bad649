//! Task domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::error::TaskError;

/// A user task created by the workflow engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Task ID.
    pub id: String,
    /// Task name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Category.
    pub category: Option<String>,
    /// Current assignee.
    pub assignee: Option<Uuid>,
    /// Owner (delegating user).
    pub owner: Option<Uuid>,
    /// Process instance the task belongs to.
    pub process_instance_id: Option<String>,
    /// Form key.
    pub form_key: Option<String>,
    /// Priority.
    pub priority: i32,
    /// Due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Whether the task has been completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Whether the user is the assignee or the owner.
    #[must_use]
    pub fn is_assignee_or_owner(&self, user_id: Uuid) -> bool {
        self.assignee == Some(user_id) || self.owner == Some(user_id)
    }
}

/// Kind of association between a task and a user or group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityLinkType {
    /// The user or group may claim the task.
    Candidate,
    /// The user is involved in the task.
    Participant,
}

impl IdentityLinkType {
    /// Returns the string representation of the link type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Candidate => "candidate",
            Self::Participant => "participant",
        }
    }

    /// Parses a link type from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "candidate" => Some(Self::Candidate),
            "participant" => Some(Self::Participant),
            _ => None,
        }
    }
}

impl fmt::Display for IdentityLinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Association of a user or a group with a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityLink {
    /// Link kind.
    pub link_type: IdentityLinkType,
    /// Linked user.
    pub user_id: Option<Uuid>,
    /// Linked group.
    pub group_id: Option<Uuid>,
}

impl IdentityLink {
    /// A user participant link.
    #[must_use]
    pub fn participant(user_id: Uuid) -> Self {
        Self {
            link_type: IdentityLinkType::Participant,
            user_id: Some(user_id),
            group_id: None,
        }
    }

    /// A candidate user link.
    #[must_use]
    pub fn candidate_user(user_id: Uuid) -> Self {
        Self {
            link_type: IdentityLinkType::Candidate,
            user_id: Some(user_id),
            group_id: None,
        }
    }

    /// A candidate group link.
    #[must_use]
    pub fn candidate_group(group_id: Uuid) -> Self {
        Self {
            link_type: IdentityLinkType::Candidate,
            user_id: None,
            group_id: Some(group_id),
        }
    }
}

/// How an involve request identifies the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvolvedUserRef {
    /// By user ID.
    Id(Uuid),
    /// By email address.
    Email(String),
}

impl InvolvedUserRef {
    /// Picks the user reference from request fields; the ID wins when both are set.
    ///
    /// # Errors
    ///
    /// Returns `InvolvedUserRequired` when neither field is usable.
    pub fn from_parts(user_id: Option<Uuid>, email: Option<String>) -> Result<Self, TaskError> {
        match (user_id, email) {
            (Some(id), _) => Ok(Self::Id(id)),
            (None, Some(email)) if !email.trim().is_empty() => {
                Ok(Self::Email(email.trim().to_string()))
            }
            _ => Err(TaskError::InvolvedUserRequired),
        }
    }
}

impl fmt::Display for InvolvedUserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Email(email) => f.write_str(email),
        }
    }
}

/// A validated task action with the state change it implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    /// Complete the task.
    Complete {
        /// User completing the task.
        completed_by: Uuid,
        /// Completion time.
        completed_at: DateTime<Utc>,
    },
    /// Set the assignee.
    Assign {
        /// New assignee.
        assignee: Uuid,
    },
    /// Add a participant link.
    Involve {
        /// User to involve.
        user_id: Uuid,
    },
    /// Remove a participant link.
    RemoveInvolved {
        /// User to remove.
        user_id: Uuid,
    },
    /// Assign the task to the claiming user.
    Claim {
        /// Claiming user.
        assignee: Uuid,
    },
}

impl TaskAction {
    /// Name of the action, as used in routes and logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Complete { .. } => "complete",
            Self::Assign { .. } => "assign",
            Self::Involve { .. } => "involve",
            Self::RemoveInvolved { .. } => "remove-involved",
            Self::Claim { .. } => "claim",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_link_type_roundtrip() {
        for t in [IdentityLinkType::Candidate, IdentityLinkType::Participant] {
            assert_eq!(IdentityLinkType::parse(t.as_str()), Some(t));
        }
        assert_eq!(IdentityLinkType::parse("owner"), None);
        assert_eq!(IdentityLinkType::Participant.to_string(), "participant");
    }

    #[test]
    fn test_involved_user_ref_prefers_id() {
        let id = Uuid::new_v4();
        assert_eq!(
            InvolvedUserRef::from_parts(Some(id), Some("x@y.z".into())).unwrap(),
            InvolvedUserRef::Id(id)
        );
        assert_eq!(
            InvolvedUserRef::from_parts(None, Some(" x@y.z ".into())).unwrap(),
            InvolvedUserRef::Email("x@y.z".into())
        );
    }

    #[test]
    fn test_involved_user_ref_requires_something() {
        assert!(matches!(
            InvolvedUserRef::from_parts(None, None),
            Err(TaskError::InvolvedUserRequired)
        ));
        assert!(matches!(
            InvolvedUserRef::from_parts(None, Some("   ".into())),
            Err(TaskError::InvolvedUserRequired)
        ));
    }
}
