use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::follow as FollowApi;
use domain::Id;

use log::*;

/// POST a new follow edge from the acting user to the target user.
#[utoipa::path(
    post,
    path = "/users/{id}/follow",
    params(
        ("id" = i64, Path, description = "User id to follow")
    ),
    responses(
        (status = 201, description = "Successfully followed the user", body = domain::follows::Model),
        (status = 400, description = "Attempted to follow yourself"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Already following this user"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("verified_user_header" = [])
    )
)]
pub async fn follow(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST follow: {} -> {id}", user.id);

    let edge = FollowApi::follow(app_state.db_conn_ref(), app_state.cache_ref(), user.id, id)
        .await?;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), edge)))
}

/// DELETE the follow edge from the acting user to the target user.
#[utoipa::path(
    delete,
    path = "/users/{id}/follow",
    params(
        ("id" = i64, Path, description = "User id to unfollow")
    ),
    responses(
        (status = 204, description = "Successfully unfollowed the user"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No follow edge exists"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("verified_user_header" = [])
    )
)]
pub async fn unfollow(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE follow: {} -> {id}", user.id);

    FollowApi::unfollow(app_state.db_conn_ref(), app_state.cache_ref(), user.id, id).await?;

    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}

/// GET the users following the given user (cached view).
#[utoipa::path(
    get,
    path = "/users/{id}/followers",
    params(
        ("id" = i64, Path, description = "User id whose followers to list")
    ),
    responses(
        (status = 200, description = "Successfully retrieved followers", body = [domain::follow::FollowView]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("verified_user_header" = [])
    )
)]
pub async fn followers(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET followers of user: {id}");

    let views =
        FollowApi::get_followers(app_state.db_conn_ref(), app_state.cache_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), views)))
}

/// GET the users the given user follows (cached view).
#[utoipa::path(
    get,
    path = "/users/{id}/following",
    params(
        ("id" = i64, Path, description = "User id whose following list to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved following list", body = [domain::follow::FollowView]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("verified_user_header" = [])
    )
)]
pub async fn following(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET following of user: {id}");

    let views =
        FollowApi::get_following(app_state.db_conn_ref(), app_state.cache_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), views)))
}
