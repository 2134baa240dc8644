//! Dispatcher — orchestrates one trigger-processing transaction.
//!
//! A `process` call walks the state machine
//! `Received → RulesLoaded → {per rule: ConditionEvaluated → (Skipped |
//! ActionsExecuted → Logged)} → Completed`. Failures below rule level are
//! contained in log records and the returned summary; only a malformed
//! context (caught at context construction) or an unavailable rule store
//! abort the call.
//!
//! Re-entrant triggers emitted by actions are processed synchronously,
//! depth-first, inside the same logical call stack, with the chain depth
//! threaded as an argument. Each `process` call is otherwise stateless, so
//! concurrent triggers for different boards share nothing.

use std::future::Future;
use std::pin::Pin;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use boardflow_domain::automation::{
    ActionError, ActionOutcome, AutomationRule, ExecutionStatus, TriggerContext,
};
use boardflow_domain::error::{BoardFlowError, NotFoundError, RuleDefinitionError};
use boardflow_domain::event::{Event, EventType};
use boardflow_domain::id::RuleId;

use crate::executor::ActionExecutor;
use crate::ports::{EventPublisher, LogStore, RuleStore, TaskService};
use crate::recorder::ExecutionLogRecorder;

/// Engine tunables, supplied by the composition root.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Maximum number of trigger levels in one automation chain, counting
    /// the external trigger as depth zero. Re-entry past the limit fails
    /// the triggering action with
    /// [`ActionError::ChainDepthExceeded`] and halts only that chain.
    pub max_chain_depth: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { max_chain_depth: 5 }
    }
}

/// Per-call options for [`Dispatcher::process`].
#[derive(Debug, Default, Clone)]
pub struct ProcessOptions {
    /// Mark resulting logs as test runs. The engine still calls every
    /// collaborator — callers supply idempotent/no-op collaborators for
    /// preview purposes — and the returned summary shape is identical to a
    /// live run.
    pub dry_run: bool,
    /// Cooperative cancellation, polled between rules and between actions.
    /// An in-flight action always finishes so no mutation is left
    /// half-applied.
    pub cancel: CancellationToken,
}

/// Aggregate result of one `process` call.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ProcessSummary {
    /// Rules whose conditions evaluated true.
    pub rules_matched: usize,
    /// Rules whose action list was executed.
    pub rules_executed: usize,
    /// One entry per attempted rule, including invalid-definition failures.
    pub per_rule_results: Vec<RuleResult>,
}

/// Per-rule slice of a [`ProcessSummary`].
#[derive(Debug, Clone, Serialize)]
pub struct RuleResult {
    pub rule_id: RuleId,
    pub status: ExecutionStatus,
    pub action_outcomes: Vec<ActionOutcome>,
}

/// The orchestration unit: receives a trigger, loads matching rules,
/// evaluates conditions, runs actions, records logs, and bounds recursion.
pub struct Dispatcher<R, T, S, P> {
    rules: R,
    executor: ActionExecutor<T>,
    recorder: ExecutionLogRecorder<S>,
    publisher: P,
    config: EngineConfig,
}

impl<R, T, S, P> Dispatcher<R, T, S, P>
where
    R: RuleStore + Sync,
    T: TaskService + Sync,
    S: LogStore + Sync,
    P: EventPublisher + Sync,
{
    pub fn new(rules: R, tasks: T, logs: S, publisher: P, config: EngineConfig) -> Self {
        Self {
            rules,
            executor: ActionExecutor::new(tasks),
            recorder: ExecutionLogRecorder::new(logs),
            publisher,
            config,
        }
    }

    /// Process one trigger against its board's active rules.
    ///
    /// Never fails merely because a rule or action failed; those outcomes
    /// are contained in the summary and the execution logs.
    ///
    /// # Errors
    ///
    /// Returns [`BoardFlowError::TriggerAborted`] when the rule store is
    /// unavailable — nothing was executed or logged and the caller may
    /// retry the whole trigger.
    #[tracing::instrument(
        skip_all,
        fields(board_id = %context.board_id, trigger = %context.trigger, dry_run = options.dry_run)
    )]
    pub async fn process(
        &self,
        context: TriggerContext,
        options: ProcessOptions,
    ) -> Result<ProcessSummary, BoardFlowError> {
        self.process_at_depth(&context, &options, 0).await
    }

    /// Test a single rule against a sample context, forcing dry run.
    ///
    /// Works on inactive rules — this is how authors preview a rule before
    /// activating it. A trigger mismatch between the rule and the sample
    /// context yields an empty summary.
    ///
    /// # Errors
    ///
    /// Returns [`BoardFlowError::NotFound`] for an unknown rule id, or
    /// [`BoardFlowError::TriggerAborted`] when the rule store is
    /// unavailable.
    #[tracing::instrument(skip(self, sample_context))]
    pub async fn test_rule(
        &self,
        rule_id: RuleId,
        sample_context: TriggerContext,
    ) -> Result<ProcessSummary, BoardFlowError> {
        let rule = self.rules.get_by_id(rule_id).await?.ok_or_else(|| NotFoundError {
            entity: "AutomationRule",
            id: rule_id.to_string(),
        })?;
        let options = ProcessOptions {
            dry_run: true,
            cancel: CancellationToken::new(),
        };

        let mut summary = ProcessSummary::default();
        if rule.trigger != sample_context.trigger || rule.actions.is_empty() {
            return Ok(summary);
        }
        if let Err(err) = rule.check_definition() {
            summary
                .per_rule_results
                .push(self.fail_invalid_rule(&rule, &sample_context, &options, &err).await);
            return Ok(summary);
        }
        match rule.conditions_match(&sample_context) {
            Ok(true) => {
                summary.rules_matched = 1;
                let result = self.execute_rule(&rule, &sample_context, &options, 0).await;
                summary.rules_executed = 1;
                summary.per_rule_results.push(result);
            }
            Ok(false) => {}
            Err(err) => {
                summary
                    .per_rule_results
                    .push(self.fail_invalid_rule(&rule, &sample_context, &options, &err).await);
            }
        }
        Ok(summary)
    }

    /// Boxed so the executor's follow-on triggers can re-enter recursively.
    fn process_at_depth<'a>(
        &'a self,
        context: &'a TriggerContext,
        options: &'a ProcessOptions,
        depth: u8,
    ) -> Pin<Box<dyn Future<Output = Result<ProcessSummary, BoardFlowError>> + Send + 'a>> {
        Box::pin(async move {
            let rules = self
                .rules
                .active_rules_for_trigger(context.board_id, context.trigger)
                .await?;
            let mut summary = ProcessSummary::default();

            for rule in &rules {
                if options.cancel.is_cancelled() {
                    tracing::debug!(rule_id = %rule.id, "cancelled before rule evaluation");
                    break;
                }
                // A rule with no actions is inert: skipped, not an error.
                if rule.actions.is_empty() {
                    tracing::debug!(rule_id = %rule.id, "skipping inert rule");
                    continue;
                }
                if let Err(err) = rule.check_definition() {
                    summary
                        .per_rule_results
                        .push(self.fail_invalid_rule(rule, context, options, &err).await);
                    continue;
                }
                match rule.conditions_match(context) {
                    Ok(false) => {
                        // Skipped rules leave no log record.
                        tracing::debug!(rule_id = %rule.id, "conditions not met");
                    }
                    Ok(true) => {
                        summary.rules_matched += 1;
                        let result = self.execute_rule(rule, context, options, depth).await;
                        summary.rules_executed += 1;
                        summary.per_rule_results.push(result);
                    }
                    Err(err) => {
                        summary
                            .per_rule_results
                            .push(self.fail_invalid_rule(rule, context, options, &err).await);
                    }
                }
            }
            Ok(summary)
        })
    }

    /// Run one matched rule's actions, strictly in declared order and
    /// best-effort: a failed action is recorded and the next action still
    /// runs against the original context.
    async fn execute_rule(
        &self,
        rule: &AutomationRule,
        context: &TriggerContext,
        options: &ProcessOptions,
        depth: u8,
    ) -> RuleResult {
        let mut draft = self.recorder.begin(rule, context, options.dry_run);
        let mut cancelled = false;

        for action in &rule.actions {
            if cancelled || options.cancel.is_cancelled() {
                cancelled = true;
                self.recorder
                    .record_action(&mut draft, ActionOutcome::cancelled(action));
                continue;
            }
            match self.executor.perform(action, context).await {
                Ok(Some(follow_on)) => {
                    if depth + 1 >= self.config.max_chain_depth {
                        tracing::warn!(
                            rule_id = %rule.id,
                            max_depth = self.config.max_chain_depth,
                            "automation chain depth limit reached"
                        );
                        self.recorder.record_action(
                            &mut draft,
                            ActionOutcome::failed(
                                action,
                                ActionError::ChainDepthExceeded {
                                    max_depth: self.config.max_chain_depth,
                                },
                            ),
                        );
                    } else {
                        self.recorder
                            .record_action(&mut draft, ActionOutcome::succeeded(action));
                        // Chained failures never propagate to the caller of
                        // the original trigger.
                        if let Err(err) =
                            self.process_at_depth(&follow_on, options, depth + 1).await
                        {
                            tracing::warn!(
                                rule_id = %rule.id,
                                error = %err,
                                "chained trigger processing failed"
                            );
                        }
                    }
                }
                Ok(None) => {
                    self.recorder
                        .record_action(&mut draft, ActionOutcome::succeeded(action));
                }
                Err(err) => {
                    tracing::warn!(rule_id = %rule.id, action = %action, error = %err, "action failed");
                    self.recorder
                        .record_action(&mut draft, ActionOutcome::failed(action, err));
                }
            }
        }

        let status = if cancelled {
            ExecutionStatus::Failure
        } else {
            ExecutionStatus::from_outcomes(draft.outcomes())
        };
        let log = self.recorder.finish(draft, status).await;

        let event = Event::new(
            EventType::RuleTriggered,
            Some(rule.id),
            serde_json::json!({
                "board_id": rule.board_id,
                "status": status,
                "test_run": options.dry_run,
            }),
        );
        // Fire-and-forget: observability must not affect control flow.
        let _ = self.publisher.publish(event).await;

        RuleResult {
            rule_id: rule.id,
            status,
            action_outcomes: log.actions_executed,
        }
    }

    /// Record a failure-status log for a rule whose definition the engine
    /// does not recognize. No actions are executed; sibling rules still
    /// evaluate normally.
    async fn fail_invalid_rule(
        &self,
        rule: &AutomationRule,
        context: &TriggerContext,
        options: &ProcessOptions,
        err: &RuleDefinitionError,
    ) -> RuleResult {
        tracing::warn!(rule_id = %rule.id, error = %err, "invalid rule definition");
        let mut draft = self.recorder.begin(rule, context, options.dry_run);
        self.recorder.record_error(&mut draft, err.to_string());
        let log = self.recorder.finish(draft, ExecutionStatus::Failure).await;

        let event = Event::new(
            EventType::RuleFailed,
            Some(rule.id),
            serde_json::json!({
                "board_id": rule.board_id,
                "error": err.to_string(),
            }),
        );
        let _ = self.publisher.publish(event).await;

        RuleResult {
            rule_id: rule.id,
            status: ExecutionStatus::Failure,
            action_outcomes: log.actions_executed,
        }
    }
}
