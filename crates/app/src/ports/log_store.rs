//! Log store port — persistence for execution logs.
//!
//! The engine only ever appends; the query side exists for external
//! reporting surfaces and is exposed through
//! [`LogQueryService`](crate::services::log_query_service::LogQueryService).

use std::future::Future;
use std::sync::Arc;

use boardflow_domain::automation::{AutomationLog, ExecutionStatus};
use boardflow_domain::error::BoardFlowError;
use boardflow_domain::id::RuleId;

/// Filter for log listings.
#[derive(Debug, Clone, Copy)]
pub struct LogQuery {
    pub status: Option<ExecutionStatus>,
    /// Dry-run logs are excluded from listings unless explicitly requested.
    pub include_test_runs: bool,
    /// Maximum number of records to return.
    pub limit: usize,
}

/// Repository for persisting and querying [`AutomationLog`]s.
pub trait LogStore {
    /// Persist one finalized log record. Records are append-only and never
    /// mutated afterwards.
    fn append(&self, log: AutomationLog) -> impl Future<Output = Result<(), BoardFlowError>> + Send;

    /// Find logs for a rule, newest-first, bounded by `query.limit`.
    fn list_by_rule(
        &self,
        rule_id: RuleId,
        query: LogQuery,
    ) -> impl Future<Output = Result<Vec<AutomationLog>, BoardFlowError>> + Send;
}

impl<T: LogStore + Send + Sync> LogStore for Arc<T> {
    fn append(&self, log: AutomationLog) -> impl Future<Output = Result<(), BoardFlowError>> + Send {
        (**self).append(log)
    }

    fn list_by_rule(
        &self,
        rule_id: RuleId,
        query: LogQuery,
    ) -> impl Future<Output = Result<Vec<AutomationLog>, BoardFlowError>> + Send {
        (**self).list_by_rule(rule_id, query)
    }
}
