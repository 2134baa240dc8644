//! # boardflow-app
//!
//! Application layer — the automation engine and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `RuleStore` — read-only rule lookup for a board and trigger
//!   - `TaskService` — the mutation collaborator performing action side effects
//!   - `LogStore` — append & query execution logs
//!   - `EventPublisher` — fire-and-forget engine events
//! - Provide the engine itself:
//!   - `Dispatcher` — loads rules, evaluates conditions, runs actions,
//!     writes logs, bounds re-entrant trigger chains
//!   - `ActionExecutor` — one action's side effect and follow-on context
//!   - `ExecutionLogRecorder` — per-rule audit records, best-effort persisted
//!   - `CachingRuleStore` — explicit rule cache with an invalidation hook
//!   - `LogQueryService` — the bounded log read path
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `boardflow-domain` only (plus `tokio::sync` for channels and
//! `tokio-util` for cancellation). Never imports adapter crates. Adapters
//! depend on *this* crate, not the reverse.

pub mod dispatcher;
pub mod event_bus;
pub mod executor;
pub mod ports;
pub mod recorder;
pub mod rule_cache;
pub mod services;
