//! Caching decorator for the rule store.
//!
//! An explicit cache object the composition root may wrap around its rule
//! store before handing it to the dispatcher — there is no ambient global.
//! The external rule-store collaborator is expected to call
//! [`CachingRuleStore::invalidate_board`] whenever a board's rules are
//! edited.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use boardflow_domain::automation::{AutomationRule, Trigger};
use boardflow_domain::error::BoardFlowError;
use boardflow_domain::id::{BoardId, RuleId};

use crate::ports::RuleStore;

/// Caches `active_rules_for_trigger` results per `(board, trigger)` pair.
///
/// `get_by_id` is deliberately uncached: it serves the rule-testing path,
/// where authors expect to see their latest edits.
pub struct CachingRuleStore<S> {
    inner: S,
    cache: Mutex<HashMap<(BoardId, Trigger), Vec<AutomationRule>>>,
}

impl<S> CachingRuleStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Drop every cached entry for a board. Invalidation hook for the
    /// external rule store to call on rule create/update/delete.
    pub fn invalidate_board(&self, board_id: BoardId) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(board, _), _| *board != board_id);
    }

    /// Drop the whole cache.
    pub fn clear(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl<S: RuleStore + Sync> RuleStore for CachingRuleStore<S> {
    fn active_rules_for_trigger(
        &self,
        board_id: BoardId,
        trigger: Trigger,
    ) -> impl Future<Output = Result<Vec<AutomationRule>, BoardFlowError>> + Send {
        async move {
            let cached = {
                let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
                cache.get(&(board_id, trigger)).cloned()
            };
            if let Some(rules) = cached {
                return Ok(rules);
            }
            let rules = self.inner.active_rules_for_trigger(board_id, trigger).await?;
            self.cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert((board_id, trigger), rules.clone());
            Ok(rules)
        }
    }

    fn get_by_id(
        &self,
        id: RuleId,
    ) -> impl Future<Output = Result<Option<AutomationRule>, BoardFlowError>> + Send {
        self.inner.get_by_id(id)
    }
}
