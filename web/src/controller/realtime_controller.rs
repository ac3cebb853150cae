use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::{AppState, Error};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::friend_request as FriendRequestApi;
use sse::message::ClientMessage;

use log::*;

/// POST a client-initiated realtime message into the friend-request state
/// machine. The acting user is always the verified connection identity, never
/// anything inside the payload. Failures are logged and swallowed: the relay
/// is fire-and-forget, exactly like the transport it fronts, and any durable
/// outcome is observable through the read endpoints.
#[utoipa::path(
    post,
    path = "/realtime/message",
    responses(
        (status = 202, description = "Message accepted for processing"),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("verified_user_header" = [])
    )
)]
pub async fn relay(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(message): Json<ClientMessage>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST realtime message from user {}: {message:?}", user.id);

    let db = app_state.db_conn_ref();
    let publisher = app_state.event_publisher.as_ref();

    let outcome = match message {
        ClientMessage::SendFriendRequest { receiver_id } => {
            FriendRequestApi::send_request(db, publisher, user.id, receiver_id)
                .await
                .map(|_| ())
        }
        ClientMessage::AcceptFriendRequest { request_id } => {
            FriendRequestApi::accept_request(db, publisher, request_id, user.id)
                .await
                .map(|_| ())
        }
        ClientMessage::RejectFriendRequest { request_id } => {
            FriendRequestApi::reject_request(db, publisher, request_id, user.id)
                .await
                .map(|_| ())
        }
    };

    if let Err(err) = outcome {
        error!("Error processing realtime message from user {}: {err}", user.id);
    }

    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::ACCEPTED.into(),
    )))
}
