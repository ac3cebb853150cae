use crate::extractors::RejectionType;
use crate::AppState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use domain::{users, Id};
use log::*;

/// Header carrying the upstream-verified user id. The fronting gateway
/// authenticates the credential and attaches the id; this core trusts it
/// and never re-verifies credentials itself.
pub(crate) const VERIFIED_USER_HEADER: &str = "x-user-id";

pub(crate) struct AuthenticatedUser(pub users::Model);

// This extractor resolves the verified id against the account table and
// refuses principals that are unknown (401) or not approved to act (403).
// Controllers receive the full user row so they never re-fetch the actor.
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = RejectionType;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(VERIFIED_USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<Id>().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized".to_string()))?;

        let app_state = AppState::from_ref(state);

        let user = domain::user::find_by_id(app_state.db_conn_ref(), user_id)
            .await
            .map_err(|err| {
                debug!("Verified user id {user_id} did not resolve: {err}");
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            })?;

        if !user.is_approved {
            return Err((StatusCode::FORBIDDEN, "Forbidden".to_string()));
        }

        Ok(AuthenticatedUser(user))
    }
}
