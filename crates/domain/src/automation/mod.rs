//! Automation — trigger → condition → action rules.
//!
//! A rule pairs a [`Trigger`] type with optional [`Condition`]s that must
//! hold against the trigger's context and an ordered list of [`Action`]s to
//! execute. Rules are owned by a board and evaluated in stable creation
//! order so that runs with identical inputs are reproducible.

mod action;
mod condition;
mod context;
mod log;
mod trigger;

pub use action::{Action, ActionError};
pub use condition::{Condition, Operator, evaluate_all};
pub use context::{TriggerContext, TriggerContextBuilder};
pub use log::{ActionOutcome, ActionStatus, AutomationLog, ExecutionStatus};
pub use trigger::Trigger;

use serde::{Deserialize, Serialize};

use crate::error::{BoardFlowError, RuleDefinitionError, ValidationError};
use crate::id::{BoardId, RuleId, UserId};
use crate::time::{Timestamp, now};

/// A declarative rule that reacts to board events by executing actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationRule {
    pub id: RuleId,
    /// Owning board; immutable after creation.
    pub board_id: BoardId,
    pub trigger: Trigger,
    /// Condition clauses combined with implicit AND; empty means
    /// "always match".
    pub conditions: Vec<Condition>,
    pub actions: Vec<Action>,
    /// Inactive rules are never matched.
    pub active: bool,
    /// Provenance only; not consulted by the engine.
    pub created_by: Option<UserId>,
    pub created_at: Timestamp,
}

impl AutomationRule {
    /// Create a builder for constructing an [`AutomationRule`].
    #[must_use]
    pub fn builder() -> AutomationRuleBuilder {
        AutomationRuleBuilder::default()
    }

    /// Check domain invariants, as enforced at rule-authoring time.
    ///
    /// # Errors
    ///
    /// Returns [`BoardFlowError::Validation`] when `actions` is empty
    /// ([`ValidationError::NoActions`]). Note that the engine itself treats
    /// an action-less stored rule as inert and skips it without error.
    pub fn validate(&self) -> Result<(), BoardFlowError> {
        if self.actions.is_empty() {
            return Err(ValidationError::NoActions.into());
        }
        Ok(())
    }

    /// Scan the rule for parts the engine does not recognize.
    ///
    /// Runs before any condition is evaluated so that a misconfigured rule
    /// is always surfaced to its author, even when an earlier condition
    /// would have short-circuited the match.
    ///
    /// # Errors
    ///
    /// Returns [`RuleDefinitionError`] for an unknown condition operator or
    /// an unrecognized action type.
    pub fn check_definition(&self) -> Result<(), RuleDefinitionError> {
        for condition in &self.conditions {
            if let Operator::Other(name) = &condition.operator {
                return Err(RuleDefinitionError::UnknownOperator(name.clone()));
            }
        }
        if self.actions.iter().any(|a| matches!(a, Action::Unknown)) {
            return Err(RuleDefinitionError::UnknownAction);
        }
        Ok(())
    }

    /// Evaluate this rule's conditions against a context (implicit AND).
    ///
    /// # Errors
    ///
    /// Returns [`RuleDefinitionError::UnknownOperator`] for an
    /// unrecognized operator; every other input evaluates to a plain
    /// `true`/`false`.
    pub fn conditions_match(&self, context: &TriggerContext) -> Result<bool, RuleDefinitionError> {
        evaluate_all(&self.conditions, context)
    }
}

/// Step-by-step builder for [`AutomationRule`].
#[derive(Debug, Default)]
pub struct AutomationRuleBuilder {
    id: Option<RuleId>,
    board_id: Option<BoardId>,
    trigger: Option<Trigger>,
    conditions: Vec<Condition>,
    actions: Vec<Action>,
    active: Option<bool>,
    created_by: Option<UserId>,
}

impl AutomationRuleBuilder {
    #[must_use]
    pub fn id(mut self, id: RuleId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn board_id(mut self, board_id: BoardId) -> Self {
        self.board_id = Some(board_id);
        self
    }

    #[must_use]
    pub fn trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    #[must_use]
    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    #[must_use]
    pub fn created_by(mut self, created_by: UserId) -> Self {
        self.created_by = Some(created_by);
        self
    }

    /// Consume the builder, validate, and return an [`AutomationRule`].
    ///
    /// # Errors
    ///
    /// Returns [`BoardFlowError::Validation`] if the rule has no trigger or
    /// no actions.
    pub fn build(self) -> Result<AutomationRule, BoardFlowError> {
        let trigger = self.trigger.ok_or(ValidationError::NoTrigger)?;
        let rule = AutomationRule {
            id: self.id.unwrap_or_default(),
            board_id: self.board_id.unwrap_or_default(),
            trigger,
            conditions: self.conditions,
            actions: self.actions,
            active: self.active.unwrap_or(true),
            created_by: self.created_by,
            created_at: now(),
        };
        rule.validate()?;
        Ok(rule)
    }
}
