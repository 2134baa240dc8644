//! Action — one declarative side-effecting step of a rule.
//!
//! Each action delegates a single mutation to the external task-service
//! collaborator; the engine knows nothing about the mutation's storage
//! mechanics, only that the call returns success or a typed failure.

use serde::{Deserialize, Serialize};

use crate::id::{LabelId, ListId, UserId};

/// An operation to execute when a rule's trigger fires and all conditions
/// are satisfied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Move the context's task to another list.
    MoveTask { target_list_id: ListId },
    /// Assign a member to the context's task.
    AssignMember { user_id: UserId },
    /// Attach a label to the context's task.
    AddLabel { label_id: LabelId },
    /// Detach a label from the context's task.
    RemoveLabel { label_id: LabelId },
    /// Set the task's due date. RFC 3339; parsed at execution time so a
    /// malformed stored value fails the action, not the engine.
    SetDueDate { date: String },
    /// Post a comment on the task. `{{field.path}}` placeholders are
    /// rendered from the trigger context.
    PostComment { text: String },
    /// POST a JSON payload to an external URL.
    SendWebhook {
        url: String,
        #[serde(default)]
        payload: serde_json::Value,
    },
    /// Append an item to the task's checklist.
    CreateChecklistItem { content: String },
    /// Unrecognized action type in stored rule data.
    #[serde(other)]
    Unknown,
}

impl Action {
    /// The wire name of this action's type, as recorded in log outcomes.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MoveTask { .. } => "move_task",
            Self::AssignMember { .. } => "assign_member",
            Self::AddLabel { .. } => "add_label",
            Self::RemoveLabel { .. } => "remove_label",
            Self::SetDueDate { .. } => "set_due_date",
            Self::PostComment { .. } => "post_comment",
            Self::SendWebhook { .. } => "send_webhook",
            Self::CreateChecklistItem { .. } => "create_checklist_item",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MoveTask { target_list_id } => write!(f, "move_task({target_list_id})"),
            Self::AssignMember { user_id } => write!(f, "assign_member({user_id})"),
            Self::AddLabel { label_id } => write!(f, "add_label({label_id})"),
            Self::RemoveLabel { label_id } => write!(f, "remove_label({label_id})"),
            Self::SetDueDate { date } => write!(f, "set_due_date({date})"),
            Self::SendWebhook { url, .. } => write!(f, "send_webhook({url})"),
            Self::PostComment { .. } | Self::CreateChecklistItem { .. } | Self::Unknown => {
                f.write_str(self.kind())
            }
        }
    }
}

/// A typed failure scoped to a single action.
///
/// Action errors are *data*: they are recorded in the action's log outcome
/// and never propagate past the rule, so sibling actions and sibling rules
/// keep running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionError {
    /// The task store detected a conflicting concurrent write.
    #[error("conflicting write: {reason}")]
    Conflict { reason: String },
    /// The action's parameter set is structurally invalid for this context.
    #[error("invalid action parameters: {reason}")]
    InvalidParameters { reason: String },
    /// The mutation collaborator could not be reached.
    #[error("collaborator unavailable: {reason}")]
    Unavailable { reason: String },
    /// A chained trigger would exceed the maximum automation chain depth.
    #[error("automation chain exceeded maximum depth {max_depth}")]
    ChainDepthExceeded { max_depth: u8 },
}

impl ActionError {
    #[must_use]
    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn invalid_parameters(reason: impl Into<String>) -> Self {
        Self::InvalidParameters {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_deserialize_move_task_from_tagged_json() {
        let list_id = ListId::new();
        let a: Action = serde_json::from_value(json!({
            "type": "move_task",
            "target_list_id": list_id
        }))
        .unwrap();
        assert_eq!(a, Action::MoveTask {
            target_list_id: list_id
        });
    }

    #[test]
    fn should_deserialize_send_webhook_with_default_payload() {
        let a: Action = serde_json::from_value(json!({
            "type": "send_webhook",
            "url": "https://example.com/hook"
        }))
        .unwrap();
        match a {
            Action::SendWebhook { url, payload } => {
                assert_eq!(url, "https://example.com/hook");
                assert!(payload.is_null());
            }
            other => panic!("expected SendWebhook, got {other:?}"),
        }
    }

    #[test]
    fn should_deserialize_unrecognized_action_type_as_unknown() {
        let a: Action = serde_json::from_value(json!({
            "type": "archive_task",
            "reason": "stale"
        }))
        .unwrap();
        assert_eq!(a, Action::Unknown);
    }

    #[test]
    fn should_roundtrip_actions_through_serde_json() {
        let actions = vec![
            Action::AssignMember {
                user_id: UserId::new(),
            },
            Action::SetDueDate {
                date: "2026-04-01T09:00:00+00:00".to_string(),
            },
            Action::PostComment {
                text: "Auto-moved by {{label.name}}".to_string(),
            },
            Action::CreateChecklistItem {
                content: "Verify deploy".to_string(),
            },
        ];
        for action in &actions {
            let json = serde_json::to_string(action).unwrap();
            let parsed: Action = serde_json::from_str(&json).unwrap();
            assert_eq!(&parsed, action);
        }
    }

    #[test]
    fn should_expose_wire_name_via_kind() {
        let a = Action::AddLabel {
            label_id: LabelId::new(),
        };
        assert_eq!(a.kind(), "add_label");
        assert_eq!(Action::Unknown.kind(), "unknown");
    }

    #[test]
    fn should_display_action_with_salient_parameter() {
        let list_id = ListId::new();
        let a = Action::MoveTask {
            target_list_id: list_id,
        };
        assert_eq!(a.to_string(), format!("move_task({list_id})"));
        assert_eq!(
            Action::PostComment {
                text: "hi".to_string()
            }
            .to_string(),
            "post_comment"
        );
    }

    #[test]
    fn should_serialize_action_error_with_kind_tag() {
        let err = ActionError::conflict("task version changed");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "conflict");
        assert_eq!(json["reason"], "task version changed");
    }

    #[test]
    fn should_roundtrip_chain_depth_error_through_serde_json() {
        let err = ActionError::ChainDepthExceeded { max_depth: 5 };
        let json = serde_json::to_string(&err).unwrap();
        let parsed: ActionError = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, err);
    }
}
