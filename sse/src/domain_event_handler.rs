use crate::message::{Event as SseEvent, Message as SseMessage, MessageScope};
use crate::Manager;
use async_trait::async_trait;
use events::{DomainEvent, EventHandler, Id};
use log::*;
use std::sync::Arc;

/// Handles domain events by converting them to SSE messages and fanning them
/// out to the affected users' live connections.
///
/// This handler is responsible for:
/// 1. Deriving the per-recipient wire payload (the counterpart id differs
///    for each of the two parties)
/// 2. Routing the resulting SSE messages to the recipients' connections
///
/// The domain layer determines which users are involved and includes their
/// ids in the event. Recipients without a live connection receive nothing.
pub struct SseDomainEventHandler {
    sse_manager: Arc<Manager>,
}

impl SseDomainEventHandler {
    pub fn new(sse_manager: Arc<Manager>) -> Self {
        Self { sse_manager }
    }

    fn send_to_user(&self, user_id: Id, sse_event: SseEvent) {
        self.sse_manager.send_message(SseMessage {
            event: sse_event,
            scope: MessageScope::User { user_id },
        });
    }
}

#[async_trait]
impl EventHandler for SseDomainEventHandler {
    async fn handle(&self, event: &DomainEvent) {
        match *event {
            DomainEvent::FriendRequestReceived {
                request_id,
                sender_id,
                receiver_id,
            } => {
                debug!("Handling FriendRequestReceived event for request {request_id}");

                self.send_to_user(
                    receiver_id,
                    SseEvent::FriendRequestReceived {
                        sender_id,
                        request_id,
                    },
                );
            }

            DomainEvent::FriendRequestAccepted {
                request_id,
                sender_id,
                receiver_id,
            } => {
                debug!("Handling FriendRequestAccepted event for request {request_id}");

                self.send_to_user(
                    sender_id,
                    SseEvent::FriendRequestAccepted {
                        counterpart_id: receiver_id,
                        request_id,
                    },
                );
                self.send_to_user(
                    receiver_id,
                    SseEvent::FriendRequestAccepted {
                        counterpart_id: sender_id,
                        request_id,
                    },
                );
            }

            DomainEvent::FriendRequestRejected {
                request_id,
                sender_id,
                receiver_id,
            } => {
                debug!("Handling FriendRequestRejected event for request {request_id}");

                self.send_to_user(
                    sender_id,
                    SseEvent::FriendRequestRejected {
                        counterpart_id: receiver_id,
                        request_id,
                    },
                );
                self.send_to_user(
                    receiver_id,
                    SseEvent::FriendRequestRejected {
                        counterpart_id: sender_id,
                        request_id,
                    },
                );
            }

            DomainEvent::FriendRemoved {
                user_id,
                counterpart_id,
            } => {
                debug!("Handling FriendRemoved event between {user_id} and {counterpart_id}");

                self.send_to_user(user_id, SseEvent::FriendRemoved { counterpart_id });
                self.send_to_user(
                    counterpart_id,
                    SseEvent::FriendRemoved {
                        counterpart_id: user_id,
                    },
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn accepted_event_reaches_both_parties() {
        let manager = Arc::new(Manager::new());
        let handler = SseDomainEventHandler::new(manager.clone());

        let (sender_tx, mut sender_rx) = mpsc::unbounded_channel();
        let (receiver_tx, mut receiver_rx) = mpsc::unbounded_channel();
        manager.register_connection(10, sender_tx);
        manager.register_connection(20, receiver_tx);

        handler
            .handle(&DomainEvent::FriendRequestAccepted {
                request_id: 1,
                sender_id: 10,
                receiver_id: 20,
            })
            .await;

        assert!(sender_rx.try_recv().is_ok());
        assert!(receiver_rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn received_event_reaches_only_the_receiver() {
        let manager = Arc::new(Manager::new());
        let handler = SseDomainEventHandler::new(manager.clone());

        let (sender_tx, mut sender_rx) = mpsc::unbounded_channel();
        let (receiver_tx, mut receiver_rx) = mpsc::unbounded_channel();
        manager.register_connection(10, sender_tx);
        manager.register_connection(20, receiver_tx);

        handler
            .handle(&DomainEvent::FriendRequestReceived {
                request_id: 1,
                sender_id: 10,
                receiver_id: 20,
            })
            .await;

        assert!(sender_rx.try_recv().is_err());
        assert!(receiver_rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn offline_party_receives_nothing_retroactively() {
        let manager = Arc::new(Manager::new());
        let handler = SseDomainEventHandler::new(manager.clone());

        // Only the receiver is connected; the sender is offline.
        let (receiver_tx, mut receiver_rx) = mpsc::unbounded_channel();
        manager.register_connection(20, receiver_tx);

        handler
            .handle(&DomainEvent::FriendRequestAccepted {
                request_id: 1,
                sender_id: 10,
                receiver_id: 20,
            })
            .await;

        assert!(receiver_rx.try_recv().is_ok());

        // The sender connecting afterwards sees no replay.
        let (late_tx, mut late_rx) = mpsc::unbounded_channel();
        manager.register_connection(10, late_tx);
        assert!(late_rx.try_recv().is_err());
    }
}
