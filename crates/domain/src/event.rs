//! Event — an immutable record of engine activity.
//!
//! Events are produced when rules fire or fail and are published
//! fire-and-forget for observability consumers (dashboards, audit feeds).
//! They carry no control-flow weight inside the engine.

use serde::{Deserialize, Serialize};

use crate::id::{EventId, RuleId};
use crate::time::{Timestamp, now};

/// Kind of engine event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A rule matched and its actions were executed (any outcome).
    RuleTriggered,
    /// A rule could not be executed because its definition was invalid.
    RuleFailed,
}

/// An immutable record of something the engine did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub event_type: EventType,
    /// Rule concerned, when the event is about a single rule.
    pub rule_id: Option<RuleId>,
    /// Event-specific payload.
    pub data: serde_json::Value,
    pub timestamp: Timestamp,
}

impl Event {
    /// Create a new event stamped with the current time.
    #[must_use]
    pub fn new(event_type: EventType, rule_id: Option<RuleId>, data: serde_json::Value) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            rule_id,
            data,
            timestamp: now(),
        }
    }
}
