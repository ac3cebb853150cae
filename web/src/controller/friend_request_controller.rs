use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::friend_request as FriendRequestApi;
use domain::Id;

use log::*;

/// POST a new friend request from the acting user to the receiver.
#[utoipa::path(
    post,
    path = "/friend_requests/send/{receiver_id}",
    params(
        ("receiver_id" = i64, Path, description = "User id to send the request to")
    ),
    responses(
        (status = 201, description = "Successfully created a new pending friend request", body = domain::friend_requests::Model),
        (status = 400, description = "Attempted to send a request to yourself"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 409, description = "A pending request already exists between the pair"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("verified_user_header" = [])
    )
)]
pub async fn send(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(receiver_id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST friend request: {} -> {receiver_id}", user.id);

    let request = FriendRequestApi::send_request(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        receiver_id,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), request)))
}

/// PUT an accept on a pending friend request addressed to the acting user.
#[utoipa::path(
    put,
    path = "/friend_requests/accept/{id}",
    params(
        ("id" = i64, Path, description = "Friend request id to accept")
    ),
    responses(
        (status = 200, description = "Successfully accepted the friend request", body = domain::friend_requests::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Acting user is not the receiver"),
        (status = 404, description = "Friend request not found"),
        (status = 409, description = "Request was no longer pending"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("verified_user_header" = [])
    )
)]
pub async fn accept(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT accept friend request {id} by user {}", user.id);

    let request = FriendRequestApi::accept_request(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        id,
        user.id,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), request)))
}

/// PUT a reject on a pending friend request addressed to the acting user.
#[utoipa::path(
    put,
    path = "/friend_requests/reject/{id}",
    params(
        ("id" = i64, Path, description = "Friend request id to reject")
    ),
    responses(
        (status = 200, description = "Successfully rejected the friend request", body = domain::friend_requests::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Acting user is not the receiver"),
        (status = 404, description = "Friend request not found"),
        (status = 409, description = "Request was no longer pending"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("verified_user_header" = [])
    )
)]
pub async fn reject(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT reject friend request {id} by user {}", user.id);

    let request = FriendRequestApi::reject_request(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        id,
        user.id,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), request)))
}

/// GET the pending friend requests addressed to the acting user.
#[utoipa::path(
    get,
    path = "/friend_requests/received",
    responses(
        (status = 200, description = "Successfully retrieved pending received requests", body = [domain::friend_requests::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("verified_user_header" = [])
    )
)]
pub async fn received(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET pending received friend requests for user {}", user.id);

    let requests =
        FriendRequestApi::list_pending_received(app_state.db_conn_ref(), user.id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), requests)))
}

/// GET the pending friend requests the acting user has sent.
#[utoipa::path(
    get,
    path = "/friend_requests/sent",
    responses(
        (status = 200, description = "Successfully retrieved pending sent requests", body = [domain::friend_requests::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("verified_user_header" = [])
    )
)]
pub async fn sent(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET pending sent friend requests for user {}", user.id);

    let requests = FriendRequestApi::list_pending_sent(app_state.db_conn_ref(), user.id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), requests)))
}

/// DELETE an accepted friendship with the named counterpart.
#[utoipa::path(
    delete,
    path = "/friends/{username}",
    params(
        ("username" = String, Path, description = "Username of the friend to remove")
    ),
    responses(
        (status = 204, description = "Successfully removed the friendship"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No accepted friendship exists with that user"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("verified_user_header" = [])
    )
)]
pub async fn remove_friend(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE friendship between user {} and {username}", user.id);

    FriendRequestApi::remove_friend(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        &username,
    )
    .await?;

    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}
