use crate::connection::UserId;
use events::Id;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Trait for getting the SSE event type name
pub trait EventType {
    fn event_type(&self) -> &'static str;
}

/// Outbound wire events. Payloads are per-recipient: for the two-party
/// events the `counterpart_id` is always "the other user" from the
/// recipient's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    #[serde(rename = "friend_request_received")]
    FriendRequestReceived { sender_id: Id, request_id: Id },
    #[serde(rename = "friend_request_accepted")]
    FriendRequestAccepted { counterpart_id: Id, request_id: Id },
    #[serde(rename = "friend_request_rejected")]
    FriendRequestRejected { counterpart_id: Id, request_id: Id },
    #[serde(rename = "friend_removed")]
    FriendRemoved { counterpart_id: Id },
}

impl EventType for Event {
    fn event_type(&self) -> &'static str {
        match self {
            Event::FriendRequestReceived { .. } => "friend_request_received",
            Event::FriendRequestAccepted { .. } => "friend_request_accepted",
            Event::FriendRequestRejected { .. } => "friend_request_rejected",
            Event::FriendRemoved { .. } => "friend_removed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub event: Event,
    pub scope: MessageScope,
}

#[derive(Debug, Clone)]
pub enum MessageScope {
    /// Send to all connections for a specific user
    User { user_id: UserId },
}

/// Inbound messages a connected client may relay into the friend-request
/// state machine. The acting user is always the verified identity of the
/// connection; payloads never carry it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    #[serde(rename = "send_friend_request")]
    SendFriendRequest { receiver_id: Id },
    #[serde(rename = "accept_friend_request")]
    AcceptFriendRequest { request_id: Id },
    #[serde(rename = "reject_friend_request")]
    RejectFriendRequest { request_id: Id },
}
