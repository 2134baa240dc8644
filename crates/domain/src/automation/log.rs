//! Execution log — the append-only audit record of rule invocations.
//!
//! One record exists per (rule, invocation) pair, created when the
//! dispatcher begins executing a matched rule and finalized exactly once.
//! Skipped rules get no record, so the trail only contains attempted
//! executions. The engine writes logs and never reads them back; the read
//! path belongs to external reporting surfaces.

use serde::{Deserialize, Serialize};

use crate::id::{BoardId, LogId, RuleId};
use crate::time::Timestamp;

use super::{Action, ActionError};

/// Aggregate result of one rule invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// Every action succeeded.
    Success,
    /// At least one action succeeded and at least one did not.
    PartialFailure,
    /// No action succeeded, the rule definition was invalid, or the run
    /// was cancelled mid-rule.
    Failure,
}

impl ExecutionStatus {
    /// Fold per-action outcomes into the rule-level status.
    #[must_use]
    pub fn from_outcomes(outcomes: &[ActionOutcome]) -> Self {
        let succeeded = outcomes
            .iter()
            .filter(|o| o.status == ActionStatus::Succeeded)
            .count();
        if succeeded == outcomes.len() && !outcomes.is_empty() {
            Self::Success
        } else if succeeded > 0 {
            Self::PartialFailure
        } else {
            Self::Failure
        }
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::PartialFailure => "partial_failure",
            Self::Failure => "failure",
        })
    }
}

/// Result of one attempted action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Succeeded,
    Failed,
    /// Skipped because the run was cancelled before this action started.
    Cancelled,
}

/// One entry in a log's `actions_executed` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Wire name of the action type, e.g. `"move_task"`.
    pub action: String,
    pub status: ActionStatus,
    pub error: Option<ActionError>,
}

impl ActionOutcome {
    #[must_use]
    pub fn succeeded(action: &Action) -> Self {
        Self {
            action: action.kind().to_string(),
            status: ActionStatus::Succeeded,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(action: &Action, error: ActionError) -> Self {
        Self {
            action: action.kind().to_string(),
            status: ActionStatus::Failed,
            error: Some(error),
        }
    }

    #[must_use]
    pub fn cancelled(action: &Action) -> Self {
        Self {
            action: action.kind().to_string(),
            status: ActionStatus::Cancelled,
            error: None,
        }
    }
}

/// The audit record of one rule invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationLog {
    pub id: LogId,
    pub rule_id: RuleId,
    pub board_id: BoardId,
    pub status: ExecutionStatus,
    /// Set on dry-run executions; excluded from default log listings.
    pub test_run: bool,
    /// The trigger context exactly as it was evaluated, serialized.
    pub trigger_data: serde_json::Value,
    /// One entry per attempted action, in declared order.
    pub actions_executed: Vec<ActionOutcome>,
    /// Rule-level error text, e.g. an invalid rule definition.
    pub error: Option<String>,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
}
