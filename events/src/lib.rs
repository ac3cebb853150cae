//! Event system infrastructure for the social platform.
//!
//! This crate provides the event system that enables loose coupling between
//! domain logic and infrastructure concerns (like SSE notifications).
//!
//! # Architecture
//!
//! - **DomainEvent**: Enum representing all business events in the system
//! - **EventHandler**: Trait for implementing event handlers
//! - **EventPublisher**: Publishes events to registered handlers
//!
//! This crate has no dependencies on internal crates (entity, domain, etc.),
//! avoiding circular dependencies. Events carry only the ids the handlers
//! need to route and render per-recipient payloads.

use async_trait::async_trait;
use std::sync::Arc;

/// A type alias that represents any Entity's internal id field data type.
/// This matches the definition in the entity crate to maintain compatibility.
pub type Id = i64;

/// Domain events that represent business-level changes in the system.
/// These events are emitted after a friend-request mutation has been
/// durably committed; handlers must treat delivery as best-effort.
///
/// Each variant carries both party ids. The domain layer decides who is
/// involved; the transport handler derives the per-recipient payload (for
/// a given recipient, the counterpart is the other party).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    /// A new pending friend request exists. Only the receiver is notified.
    FriendRequestReceived {
        request_id: Id,
        sender_id: Id,
        receiver_id: Id,
    },
    /// The receiver accepted the request. Both parties are notified.
    FriendRequestAccepted {
        request_id: Id,
        sender_id: Id,
        receiver_id: Id,
    },
    /// The receiver rejected the request. Both parties are notified.
    FriendRequestRejected {
        request_id: Id,
        sender_id: Id,
        receiver_id: Id,
    },
    /// An accepted friendship was dissolved. Both parties are notified.
    FriendRemoved { user_id: Id, counterpart_id: Id },
}

/// Trait for handling domain events.
/// Implementations can perform side effects like sending notifications,
/// updating caches, logging, etc.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent);
}

/// Publishes domain events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    /// Store the returned publisher in your application state.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    /// Publish an event to all registered handlers.
    /// Handlers are called sequentially; a failing handler never affects
    /// the mutation that emitted the event.
    pub async fn publish(&self, event: DomainEvent) {
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingHandler {
        seen: Mutex<Vec<DomainEvent>>,
    }

    #[async_trait]
    impl EventHandler for RecordingHandler {
        async fn handle(&self, event: &DomainEvent) {
            self.seen.lock().unwrap().push(event.clone());
        }
    }

    #[tokio::test]
    async fn publish_delivers_to_all_registered_handlers() {
        let first = Arc::new(RecordingHandler {
            seen: Mutex::new(Vec::new()),
        });
        let second = Arc::new(RecordingHandler {
            seen: Mutex::new(Vec::new()),
        });

        let publisher = EventPublisher::new()
            .with_handler(first.clone())
            .with_handler(second.clone());

        let event = DomainEvent::FriendRequestReceived {
            request_id: 1,
            sender_id: 10,
            receiver_id: 20,
        };
        publisher.publish(event.clone()).await;

        assert_eq!(*first.seen.lock().unwrap(), vec![event.clone()]);
        assert_eq!(*second.seen.lock().unwrap(), vec![event]);
    }

    #[tokio::test]
    async fn publish_with_no_handlers_is_a_no_op() {
        let publisher = EventPublisher::new();

        publisher
            .publish(DomainEvent::FriendRemoved {
                user_id: 1,
                counterpart_id: 2,
            })
            .await;
    }
}
