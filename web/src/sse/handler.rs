use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::AppState;
use async_stream::stream;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use log::*;
use std::convert::Infallible;
use tokio::sync::mpsc;

/// SSE handler that establishes a long-lived connection for real-time
/// relationship updates. The extractor has already refused unauthenticated
/// and unapproved principals, so everything reaching this point is
/// registered for fan-out. A user may hold several connections at once.
pub(crate) async fn sse_handler(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Establishing SSE connection for user {}", user.id);

    let (tx, mut rx) = mpsc::unbounded_channel();

    let connection_id = app_state.sse_manager.register_connection(user.id, tx);

    let manager = app_state.sse_manager.clone();
    let user_id = user.id;

    // Create the stream - events arrive from the channel
    // The channel sends Result<Event, Infallible>, so we just pass them through
    let stream = stream! {
        while let Some(event) = rx.recv().await {
            yield event;
        }

        // Connection closed, clean up
        debug!("SSE connection closed for user {user_id}, cleaning up");
        manager.unregister_connection(&connection_id);
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
