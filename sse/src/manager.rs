use crate::connection::{ConnectionId, ConnectionRegistry, UserId};
use crate::message::{EventType, Message as SseMessage, MessageScope};
use axum::response::sse::Event;
use log::*;
use std::sync::Arc;

pub struct Manager {
    registry: Arc<ConnectionRegistry>,
}

impl Manager {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(ConnectionRegistry::new()),
        }
    }

    /// Register a new connection and return its unique ID
    pub fn register_connection(
        &self,
        user_id: UserId,
        sender: tokio::sync::mpsc::UnboundedSender<Result<Event, std::convert::Infallible>>,
    ) -> ConnectionId {
        let connection_id = self.registry.register(user_id, sender);
        info!("Registered new SSE connection for user {user_id}");
        connection_id
    }

    /// Unregister a connection by ID
    pub fn unregister_connection(&self, connection_id: &ConnectionId) {
        info!("Unregistering SSE connection");
        self.registry.unregister(connection_id);
    }

    /// Whether the user currently holds at least one live connection.
    pub fn is_online(&self, user_id: UserId) -> bool {
        self.registry.is_online(user_id)
    }

    /// Send a message based on its scope
    pub fn send_message(&self, message: SseMessage) {
        let event_type = message.event.event_type();

        let event_data = match serde_json::to_string(&message.event) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize SSE event: {e}");
                return;
            }
        };

        let event = Event::default().event(event_type).data(event_data);

        match message.scope {
            MessageScope::User { user_id } => {
                self.registry.send_to_user(user_id, event);
            }
        }
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Event as WireEvent;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn send_message_delivers_to_the_scoped_user() {
        let manager = Manager::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        manager.register_connection(1, tx);

        manager.send_message(SseMessage {
            event: WireEvent::FriendRequestReceived {
                sender_id: 2,
                request_id: 5,
            },
            scope: MessageScope::User { user_id: 1 },
        });

        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn unregistered_connection_no_longer_receives() {
        let manager = Manager::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let connection_id = manager.register_connection(1, tx);

        manager.unregister_connection(&connection_id);
        manager.send_message(SseMessage {
            event: WireEvent::FriendRemoved { counterpart_id: 2 },
            scope: MessageScope::User { user_id: 1 },
        });

        assert!(rx.try_recv().is_err());
        assert!(!manager.is_online(1));
    }
}
