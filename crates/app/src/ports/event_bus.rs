//! Event bus port — publish/subscribe for engine events.

use std::future::Future;
use std::sync::Arc;

use boardflow_domain::error::BoardFlowError;
use boardflow_domain::event::Event;

/// Publishes engine events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), BoardFlowError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for Arc<T> {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), BoardFlowError>> + Send {
        (**self).publish(event)
    }
}
