//! The acting user and lightweight user projections.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated user a request is executed for, with resolved group memberships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// User ID.
    pub id: Uuid,
    /// IDs of the groups the user is a member of.
    pub group_ids: Vec<Uuid>,
}

impl CurrentUser {
    /// Creates a user without group memberships.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            group_ids: Vec::new(),
        }
    }

    /// Creates a user with the given group memberships.
    #[must_use]
    pub fn with_groups(id: Uuid, group_ids: Vec<Uuid>) -> Self {
        Self { id, group_ids }
    }

    /// Whether the user is a member of the group.
    #[must_use]
    pub fn is_member_of(&self, group_id: Uuid) -> bool {
        self.group_ids.contains(&group_id)
    }
}

/// User summary as embedded in task and content responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// User ID.
    pub id: Uuid,
    /// Email address.
    pub email: String,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
}

impl UserSummary {
    /// Display name: first and last name when known, the email otherwise.
    #[must_use]
    pub fn full_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(name), None) | (None, Some(name)) => name.to_string(),
            (None, None) => self.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(first: Option<&str>, last: Option<&str>) -> UserSummary {
        UserSummary {
            id: Uuid::nil(),
            email: "fozzie@procdesk.dev".to_string(),
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(summary(Some("Fozzie"), Some("Bear")).full_name(), "Fozzie Bear");
        assert_eq!(summary(Some("Fozzie"), None).full_name(), "Fozzie");
        assert_eq!(summary(None, Some("Bear")).full_name(), "Bear");
        assert_eq!(summary(None, None).full_name(), "fozzie@procdesk.dev");
    }

    #[test]
    fn test_group_membership() {
        let group = Uuid::new_v4();
        let user = CurrentUser::with_groups(Uuid::new_v4(), vec![group]);
        assert!(user.is_member_of(group));
        assert!(!user.is_member_of(Uuid::new_v4()));
        assert!(!CurrentUser::new(user.id).is_member_of(group));
    }
}
