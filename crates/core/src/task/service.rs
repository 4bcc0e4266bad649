//! Task action validation.
//!
//! Every method checks that the task is still open and that the acting user may
//! touch it, then returns the `TaskAction` describing the change to persist.

use chrono::Utc;
use uuid::Uuid;

use crate::identity::CurrentUser;
use crate::task::error::TaskError;
use crate::task::types::{IdentityLink, IdentityLinkType, Task, TaskAction};

/// Stateless service validating task actions.
pub struct TaskActionService;

impl TaskActionService {
    /// Whether the user can see the task.
    ///
    /// Read access is granted to the assignee, the owner, involved participants,
    /// candidate users and members of candidate groups.
    #[must_use]
    pub fn can_read(task: &Task, links: &[IdentityLink], user: &CurrentUser) -> bool {
        if task.is_assignee_or_owner(user.id) {
            return true;
        }

        links.iter().any(|link| {
            link.user_id == Some(user.id)
                || (link.link_type == IdentityLinkType::Candidate
                    && link.group_id.is_some_and(|g| user.is_member_of(g)))
        })
    }

    /// Complete a task.
    ///
    /// Only the assignee or the owner may complete.
    pub fn complete(task: &Task, user: &CurrentUser) -> Result<TaskAction, TaskError> {
        Self::ensure_open(task)?;

        if !task.is_assignee_or_owner(user.id) {
            return Err(Self::not_permitted(task, user));
        }

        Ok(TaskAction::Complete {
            completed_by: user.id,
            completed_at: Utc::now(),
        })
    }

    /// Assign a task to another user.
    pub fn assign(
        task: &Task,
        links: &[IdentityLink],
        user: &CurrentUser,
        assignee: Option<Uuid>,
    ) -> Result<TaskAction, TaskError> {
        let assignee = assignee.ok_or(TaskError::AssigneeRequired)?;
        Self::ensure_open(task)?;
        Self::ensure_can_read(task, links, user)?;

        Ok(TaskAction::Assign { assignee })
    }

    /// Involve a user in a task.
    pub fn involve(
        task: &Task,
        links: &[IdentityLink],
        user: &CurrentUser,
        involved: Uuid,
    ) -> Result<TaskAction, TaskError> {
        Self::ensure_open(task)?;
        Self::ensure_can_read(task, links, user)?;

        Ok(TaskAction::Involve { user_id: involved })
    }

    /// Remove an involved user from a task.
    pub fn remove_involved(
        task: &Task,
        links: &[IdentityLink],
        user: &CurrentUser,
        involved: Uuid,
    ) -> Result<TaskAction, TaskError> {
        Self::ensure_open(task)?;
        Self::ensure_can_read(task, links, user)?;

        Ok(TaskAction::RemoveInvolved { user_id: involved })
    }

    /// Claim a task for the acting user.
    ///
    /// Claiming a task already assigned to the acting user is accepted.
    pub fn claim(
        task: &Task,
        links: &[IdentityLink],
        user: &CurrentUser,
    ) -> Result<TaskAction, TaskError> {
        Self::ensure_open(task)?;
        Self::ensure_can_read(task, links, user)?;

        match task.assignee {
            Some(assignee) if assignee != user.id => Err(TaskError::AlreadyClaimed {
                task_id: task.id.clone(),
                assignee,
            }),
            _ => Ok(TaskAction::Claim { assignee: user.id }),
        }
    }

    fn ensure_open(task: &Task) -> Result<(), TaskError> {
        if task.is_completed() {
            Err(TaskError::AlreadyCompleted(task.id.clone()))
        } else {
            Ok(())
        }
    }

    fn ensure_can_read(
        task: &Task,
        links: &[IdentityLink],
        user: &CurrentUser,
    ) -> Result<(), TaskError> {
        if Self::can_read(task, links, user) {
            Ok(())
        } else {
            Err(Self::not_permitted(task, user))
        }
    }

    fn not_permitted(task: &Task, user: &CurrentUser) -> TaskError {
        TaskError::NotPermitted {
            task_id: task.id.clone(),
            user_id: user.id,
        }
    }
}
