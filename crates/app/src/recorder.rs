//! Execution log recorder — assembles and persists per-rule audit records.
//!
//! A [`LogDraft`] is opened when the dispatcher begins executing a matched
//! rule, accumulates one outcome per attempted action, and is finalized
//! exactly once. Logging never affects control flow: a failed append is
//! reported through tracing and the automation result stands.

use boardflow_domain::automation::{
    ActionOutcome, AutomationLog, AutomationRule, ExecutionStatus, TriggerContext,
};
use boardflow_domain::id::{BoardId, LogId, RuleId};
use boardflow_domain::time::{Timestamp, now};

use crate::ports::LogStore;

/// An execution log being assembled for one rule invocation.
#[derive(Debug)]
pub struct LogDraft {
    id: LogId,
    rule_id: RuleId,
    board_id: BoardId,
    test_run: bool,
    trigger_data: serde_json::Value,
    outcomes: Vec<ActionOutcome>,
    error: Option<String>,
    started_at: Timestamp,
}

impl LogDraft {
    /// Outcomes recorded so far, in action order.
    #[must_use]
    pub fn outcomes(&self) -> &[ActionOutcome] {
        &self.outcomes
    }
}

/// Writes one append-only [`AutomationLog`] per attempted rule execution.
pub struct ExecutionLogRecorder<S> {
    store: S,
}

impl<S: LogStore> ExecutionLogRecorder<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Open a draft for a rule invocation, capturing the context exactly as
    /// it is about to be evaluated.
    #[must_use]
    pub fn begin(&self, rule: &AutomationRule, context: &TriggerContext, test_run: bool) -> LogDraft {
        LogDraft {
            id: LogId::new(),
            rule_id: rule.id,
            board_id: rule.board_id,
            test_run,
            trigger_data: serde_json::to_value(context).unwrap_or(serde_json::Value::Null),
            outcomes: Vec::new(),
            error: None,
            started_at: now(),
        }
    }

    /// Record the outcome of one attempted action.
    pub fn record_action(&self, draft: &mut LogDraft, outcome: ActionOutcome) {
        draft.outcomes.push(outcome);
    }

    /// Attach a rule-level error, e.g. an invalid rule definition.
    pub fn record_error(&self, draft: &mut LogDraft, error: impl Into<String>) {
        draft.error = Some(error.into());
    }

    /// Finalize the draft and persist it.
    ///
    /// Persistence is best-effort relative to the primary action effects: a
    /// store failure is reported and swallowed, never retried, and the
    /// finalized record is still returned to the caller.
    pub async fn finish(&self, draft: LogDraft, status: ExecutionStatus) -> AutomationLog {
        let log = AutomationLog {
            id: draft.id,
            rule_id: draft.rule_id,
            board_id: draft.board_id,
            status,
            test_run: draft.test_run,
            trigger_data: draft.trigger_data,
            actions_executed: draft.outcomes,
            error: draft.error,
            started_at: draft.started_at,
            finished_at: now(),
        };
        if let Err(err) = self.store.append(log.clone()).await {
            tracing::warn!(
                rule_id = %log.rule_id,
                log_id = %log.id,
                error = %err,
                "failed to persist automation log"
            );
        }
        log
    }
}
