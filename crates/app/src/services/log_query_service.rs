//! Log query service — the bounded read path over execution logs.
//!
//! Consumed by operational UIs, never by the engine itself. Listings
//! default to excluding dry-run records and are always page-capped.

use boardflow_domain::automation::{AutomationLog, ExecutionStatus};
use boardflow_domain::error::BoardFlowError;
use boardflow_domain::id::RuleId;

use crate::ports::{LogQuery, LogStore};

/// Page size applied when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 50;
/// Hard cap on a single listing, whatever the caller asks for.
pub const MAX_PAGE_SIZE: usize = 200;

/// Read-only use-cases over the execution log store.
pub struct LogQueryService<S> {
    store: S,
}

impl<S: LogStore> LogQueryService<S> {
    /// Create a new service backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// List logs for a rule, newest-first, optionally filtered by status.
    ///
    /// Dry-run logs are excluded unless `include_test_runs` is set. The
    /// page size defaults to [`DEFAULT_PAGE_SIZE`] and is clamped to
    /// [`MAX_PAGE_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the log store.
    #[tracing::instrument(skip(self))]
    pub async fn list_for_rule(
        &self,
        rule_id: RuleId,
        status: Option<ExecutionStatus>,
        include_test_runs: bool,
        limit: Option<usize>,
    ) -> Result<Vec<AutomationLog>, BoardFlowError> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
        self.store
            .list_by_rule(
                rule_id,
                LogQuery {
                    status,
                    include_test_runs,
                    limit,
                },
            )
            .await
    }
}
