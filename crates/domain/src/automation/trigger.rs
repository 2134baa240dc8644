//! Trigger — the domain event kind that activates automation rules.

use serde::{Deserialize, Serialize};

/// The closed set of domain events that can activate a rule.
///
/// Time-based triggers (`DueDateApproaching`, `DueDatePassed`) are fired by
/// an external scheduler collaborator; the engine treats them like any other
/// trigger and never schedules anything itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    TaskCreated,
    TaskMoved,
    TaskCompleted,
    DueDateApproaching,
    DueDatePassed,
    LabelAdded,
    LabelRemoved,
    MemberAssigned,
    CommentAdded,
    ChecklistCompleted,
}

impl Trigger {
    /// The wire name of this trigger, matching its serde representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TaskCreated => "task_created",
            Self::TaskMoved => "task_moved",
            Self::TaskCompleted => "task_completed",
            Self::DueDateApproaching => "due_date_approaching",
            Self::DueDatePassed => "due_date_passed",
            Self::LabelAdded => "label_added",
            Self::LabelRemoved => "label_removed",
            Self::MemberAssigned => "member_assigned",
            Self::CommentAdded => "comment_added",
            Self::ChecklistCompleted => "checklist_completed",
        }
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_trigger_as_snake_case_string() {
        let json = serde_json::to_value(Trigger::DueDateApproaching).unwrap();
        assert_eq!(json, serde_json::json!("due_date_approaching"));
    }

    #[test]
    fn should_deserialize_trigger_from_wire_name() {
        let trigger: Trigger = serde_json::from_value(serde_json::json!("label_added")).unwrap();
        assert_eq!(trigger, Trigger::LabelAdded);
    }

    #[test]
    fn should_reject_unknown_trigger_name() {
        let result: Result<Trigger, _> = serde_json::from_value(serde_json::json!("card_archived"));
        assert!(result.is_err());
    }

    #[test]
    fn should_match_display_and_serde_representation() {
        for trigger in [
            Trigger::TaskCreated,
            Trigger::TaskMoved,
            Trigger::TaskCompleted,
            Trigger::DueDateApproaching,
            Trigger::DueDatePassed,
            Trigger::LabelAdded,
            Trigger::LabelRemoved,
            Trigger::MemberAssigned,
            Trigger::CommentAdded,
            Trigger::ChecklistCompleted,
        ] {
            let json = serde_json::to_value(trigger).unwrap();
            assert_eq!(json, serde_json::json!(trigger.as_str()));
        }
    }
}
