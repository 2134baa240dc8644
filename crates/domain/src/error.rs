//! Common error types used across the workspace.
//!
//! Only [`MalformedContextError`] and [`TriggerAbortedError`] ever abort a
//! whole trigger-processing call. Everything below rule level (condition
//! errors, action failures) is contained in log records and summaries, never
//! raised to the caller.

/// Umbrella error for engine operations.
#[derive(Debug, thiserror::Error)]
pub enum BoardFlowError {
    /// Required context fields were missing.
    #[error("malformed trigger context")]
    MalformedContext(#[from] MalformedContextError),

    /// The rule store could not be queried; the whole trigger is retriable.
    #[error("trigger aborted")]
    TriggerAborted(#[from] TriggerAbortedError),

    /// A referenced record does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A domain invariant was violated.
    #[error("validation failed")]
    Validation(#[from] ValidationError),
}

/// A trigger context is missing a required field and cannot be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MalformedContextError {
    #[error("trigger context is missing the board id")]
    MissingBoardId,
    #[error("trigger context is missing the trigger type")]
    MissingTrigger,
}

/// The rule store was unavailable. Transient: the caller may safely retry
/// the entire trigger, since nothing was executed or logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("rule store unavailable: {reason}")]
pub struct TriggerAbortedError {
    pub reason: String,
}

impl TriggerAbortedError {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A record referenced by id does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    /// Kind of record, e.g. `"AutomationRule"`.
    pub entity: &'static str,
    pub id: String,
}

/// Domain invariant violations, checked at rule-authoring time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("automation rule has no actions")]
    NoActions,
    #[error("automation rule has no trigger type")]
    NoTrigger,
}

/// A stored rule references an operator or action type the engine does not
/// recognize. The rule is skipped with a failure-status log entry so the
/// misconfiguration is visible to its author; sibling rules are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleDefinitionError {
    #[error("unknown condition operator: {0}")]
    UnknownOperator(String),
    #[error("unrecognized action type")]
    UnknownAction,
}
