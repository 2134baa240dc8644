//! Rule store port — read-only lookup of a board's automation rules.

use std::future::Future;
use std::sync::Arc;

use boardflow_domain::automation::{AutomationRule, Trigger};
use boardflow_domain::error::BoardFlowError;
use boardflow_domain::id::{BoardId, RuleId};

/// Read-only query contract over the external rule store.
///
/// The engine never writes rules; authoring lives in the surrounding
/// application.
pub trait RuleStore {
    /// Active rules for a board and trigger type, in stable creation order,
    /// so that when several rules match the same trigger their execution
    /// order is deterministic and reproducible.
    ///
    /// # Errors
    ///
    /// Implementations surface store unavailability as
    /// [`BoardFlowError::TriggerAborted`]; the dispatcher then aborts the
    /// whole trigger with no partial logs and the caller may safely retry.
    fn active_rules_for_trigger(
        &self,
        board_id: BoardId,
        trigger: Trigger,
    ) -> impl Future<Output = Result<Vec<AutomationRule>, BoardFlowError>> + Send;

    /// Look up a single rule regardless of its `active` flag.
    ///
    /// Used by the rule-testing entry point, which must work on rules that
    /// have not been activated yet.
    fn get_by_id(
        &self,
        id: RuleId,
    ) -> impl Future<Output = Result<Option<AutomationRule>, BoardFlowError>> + Send;
}

impl<T: RuleStore + Send + Sync> RuleStore for Arc<T> {
    fn active_rules_for_trigger(
        &self,
        board_id: BoardId,
        trigger: Trigger,
    ) -> impl Future<Output = Result<Vec<AutomationRule>, BoardFlowError>> + Send {
        (**self).active_rules_for_trigger(board_id, trigger)
    }

    fn get_by_id(
        &self,
        id: RuleId,
    ) -> impl Future<Output = Result<Option<AutomationRule>, BoardFlowError>> + Send {
        (**self).get_by_id(id)
    }
}
