//! Property-based tests for TaskActionService.

use chrono::Utc;
use proptest::prelude::*;
use uuid::Uuid;

use crate::identity::CurrentUser;
use crate::task::error::TaskError;
use crate::task::service::TaskActionService;
use crate::task::types::{IdentityLink, Task, TaskAction};

/// Strategy for generating random UUIDs.
fn arb_uuid() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

/// How the acting user relates to the task.
#[derive(Debug, Clone, Copy)]
enum Relation {
    Assignee,
    Owner,
    Participant,
    CandidateUser,
    CandidateGroup,
    Stranger,
}

fn arb_relation() -> impl Strategy<Value = Relation> {
    prop_oneof![
        Just(Relation::Assignee),
        Just(Relation::Owner),
        Just(Relation::Participant),
        Just(Relation::CandidateUser),
        Just(Relation::CandidateGroup),
        Just(Relation::Stranger),
    ]
}

fn setup(relation: Relation, user_id: Uuid, group_id: Uuid) -> (Task, Vec<IdentityLink>, CurrentUser) {
    let mut task = Task {
        id: "task-p".to_string(),
        name: "Prop task".to_string(),
        description: None,
        category: None,
        assignee: None,
        owner: None,
        process_instance_id: None,
        form_key: None,
        priority: 50,
        due_date: None,
        created_at: Utc::now(),
        completed_at: None,
    };
    let mut links = Vec::new();
    let user = CurrentUser::with_groups(user_id, vec![group_id]);

    match relation {
        Relation::Assignee => task.assignee = Some(user_id),
        Relation::Owner => task.owner = Some(user_id),
        Relation::Participant => links.push(IdentityLink::participant(user_id)),
        Relation::CandidateUser => links.push(IdentityLink::candidate_user(user_id)),
        Relation::CandidateGroup => links.push(IdentityLink::candidate_group(group_id)),
        Relation::Stranger => {}
    }

    (task, links, user)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Only strangers lack read access.
    #[test]
    fn prop_read_access(relation in arb_relation(), user in arb_uuid(), group in arb_uuid()) {
        let (task, links, user) = setup(relation, user, group);
        let readable = TaskActionService::can_read(&task, &links, &user);
        prop_assert_eq!(readable, !matches!(relation, Relation::Stranger));
    }

    /// Complete is limited to the assignee and the owner.
    #[test]
    fn prop_complete_permission(relation in arb_relation(), user in arb_uuid(), group in arb_uuid()) {
        let (task, _links, user) = setup(relation, user, group);
        let result = TaskActionService::complete(&task, &user);
        match relation {
            Relation::Assignee | Relation::Owner => {
                let is_complete = matches!(result, Ok(TaskAction::Complete { .. }));
                prop_assert!(is_complete);
            }
            _ => {
                let denied = matches!(result, Err(TaskError::NotPermitted { .. }));
                prop_assert!(denied);
            }
        }
    }

    /// A completed task rejects every action regardless of the relation.
    #[test]
    fn prop_completed_task_is_closed(
        relation in arb_relation(),
        user in arb_uuid(),
        group in arb_uuid(),
        target in arb_uuid(),
    ) {
        let (mut task, links, user) = setup(relation, user, group);
        task.completed_at = Some(Utc::now());

        let results = [
            TaskActionService::complete(&task, &user),
            TaskActionService::assign(&task, &links, &user, Some(target)),
            TaskActionService::involve(&task, &links, &user, target),
            TaskActionService::remove_involved(&task, &links, &user, target),
            TaskActionService::claim(&task, &links, &user),
        ];
        for result in results {
            let closed = matches!(result, Err(TaskError::AlreadyCompleted(_)));
            prop_assert!(closed);
        }
    }

    /// Claiming an unassigned readable task always makes the caller the assignee.
    #[test]
    fn prop_claim_assigns_caller(user in arb_uuid(), group in arb_uuid()) {
        for relation in [Relation::Participant, Relation::CandidateUser, Relation::CandidateGroup] {
            let (task, links, caller) = setup(relation, user, group);
            let action = TaskActionService::claim(&task, &links, &caller).unwrap();
            prop_assert_eq!(action, TaskAction::Claim { assignee: caller.id });
        }
    }
}
