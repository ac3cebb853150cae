use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::user::{AvatarParams, SearchParams};
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::error::{DomainErrorKind, Error as DomainError, RelationshipErrorKind};
use domain::user as UserApi;
use domain::user::ProfileUpdate;
use domain::Id;

use log::*;

// Only the profile owner may mutate it; the upstream gateway has already
// verified who the actor is.
fn require_ownership(actor_id: Id, target_id: Id) -> Result<(), Error> {
    if actor_id != target_id {
        return Err(DomainError {
            source: None,
            error_kind: DomainErrorKind::Relationship(RelationshipErrorKind::Forbidden),
        }
        .into());
    }
    Ok(())
}

/// GET a user snapshot by id (served read-through from the cache).
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(
        ("id" = i64, Path, description = "User id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the user", body = domain::users::Model),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("verified_user_header" = [])
    )
)]
pub async fn read(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET user by id: {id}");

    let user = UserApi::get_user(app_state.db_conn_ref(), app_state.cache_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), user)))
}

/// GET a public profile by username (served read-through from the cache).
#[utoipa::path(
    get,
    path = "/users/username/{username}",
    params(
        ("username" = String, Path, description = "Username to look up")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the profile", body = domain::user::PublicProfile),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("verified_user_header" = [])
    )
)]
pub async fn read_by_username(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET profile by username: {username}");

    let profile =
        UserApi::get_profile_by_username(app_state.db_conn_ref(), app_state.cache_ref(), &username)
            .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), profile)))
}

/// GET public profiles matching a name fragment (cached per search term).
#[utoipa::path(
    get,
    path = "/users/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Successfully retrieved matching profiles", body = [domain::user::PublicProfile]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No users matched"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("verified_user_header" = [])
    )
)]
pub async fn search(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET user search: {params:?}");

    let profiles =
        UserApi::search_by_name(app_state.db_conn_ref(), app_state.cache_ref(), &params.name)
            .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), profiles)))
}

/// PUT an update to the acting user's own profile fields.
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(
        ("id" = i64, Path, description = "Id of the user to update"),
    ),
    request_body = domain::user::ProfileUpdate,
    responses(
        (status = 200, description = "Successfully updated the profile", body = domain::users::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("verified_user_header" = [])
    )
)]
pub async fn update(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(profile_update): Json<ProfileUpdate>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT update profile of user: {id}");

    require_ownership(user.id, id)?;

    let updated = UserApi::update_profile(
        app_state.db_conn_ref(),
        app_state.cache_ref(),
        id,
        profile_update,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), updated)))
}

/// PUT a new avatar URL for the acting user.
#[utoipa::path(
    put,
    path = "/users/{id}/avatar",
    params(
        ("id" = i64, Path, description = "Id of the user to update"),
    ),
    request_body = AvatarParams,
    responses(
        (status = 200, description = "Successfully updated the avatar", body = domain::users::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("verified_user_header" = [])
    )
)]
pub async fn update_avatar(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<AvatarParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT update avatar of user: {id}");

    require_ownership(user.id, id)?;

    let updated = UserApi::update_avatar(
        app_state.db_conn_ref(),
        app_state.cache_ref(),
        id,
        &params.avatar_url,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), updated)))
}
