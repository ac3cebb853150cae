use crate::error::{Error, RelationshipErrorKind};
use crate::users::Model;
use crate::{cache_evict, cache_fetch, cache_store};
use cache::{keys, CacheStore};
use entity::Id;
use entity_api::user as user_api;
use log::debug;
use sea_orm::DatabaseConnection;

pub use entity_api::user::{ProfileUpdate, PublicProfile};

/// Resolve a user id against the account table. This is the validation
/// entry point every mutation uses for its counterpart ids.
pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Ok(user_api::find_by_id(db, id).await?)
}

/// Resolve the acting user: they must exist and be approved to act.
pub(crate) async fn resolve_approved_actor(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    let user = user_api::find_by_id(db, id).await?;
    if !user.is_approved {
        return Err(Error::relationship(RelationshipErrorKind::Forbidden));
    }
    Ok(user)
}

/// Read-through user snapshot under `user:{id}`.
pub async fn get_user(
    db: &DatabaseConnection,
    cache: &dyn CacheStore,
    id: Id,
) -> Result<Model, Error> {
    let key = keys::user(id);

    if let Some(user) = cache_fetch::<Model>(cache, &key).await {
        return Ok(user);
    }

    let user = user_api::find_by_id(db, id).await?;
    debug!("Fetched user:{id} from store");

    cache_store(cache, &key, &user).await;
    Ok(user)
}

/// Read-through public profile (with aggregate counts) under
/// `user:username:{username}`.
pub async fn get_profile_by_username(
    db: &DatabaseConnection,
    cache: &dyn CacheStore,
    username: &str,
) -> Result<PublicProfile, Error> {
    let key = keys::username(username);

    if let Some(profile) = cache_fetch::<PublicProfile>(cache, &key).await {
        return Ok(profile);
    }

    let user = user_api::find_by_username(db, username).await?;
    let profile = user_api::public_profile(db, user).await?;
    debug!("Fetched profile for username {username} from store");

    cache_store(cache, &key, &profile).await;
    Ok(profile)
}

/// Read-through name search under `user:search:{term}`. An empty result is
/// reported as `NotFound` and never cached.
pub async fn search_by_name(
    db: &DatabaseConnection,
    cache: &dyn CacheStore,
    term: &str,
) -> Result<Vec<PublicProfile>, Error> {
    let key = keys::search(term);

    if let Some(profiles) = cache_fetch::<Vec<PublicProfile>>(cache, &key).await {
        return Ok(profiles);
    }

    let users = user_api::search_by_name(db, term).await?;
    if users.is_empty() {
        return Err(Error::relationship(RelationshipErrorKind::NotFound));
    }

    let mut profiles = Vec::with_capacity(users.len());
    for user in users {
        profiles.push(user_api::public_profile(db, user).await?);
    }
    debug!("Fetched search \"{term}\" from store");

    cache_store(cache, &key, &profiles).await;
    Ok(profiles)
}

/// Update profile fields, then invalidate the affected snapshot keys. The
/// invalidation runs strictly after the committed write and never
/// repopulates inline; the next reader does.
pub async fn update_profile(
    db: &DatabaseConnection,
    cache: &dyn CacheStore,
    id: Id,
    update: ProfileUpdate,
) -> Result<Model, Error> {
    let updated = user_api::update_profile(db, id, update).await?;

    cache_evict(cache, &keys::user(id)).await;
    cache_evict(cache, &keys::username(&updated.username)).await;

    Ok(updated)
}

/// Update the avatar URL, then invalidate the affected snapshot keys.
pub async fn update_avatar(
    db: &DatabaseConnection,
    cache: &dyn CacheStore,
    id: Id,
    avatar_url: &str,
) -> Result<Model, Error> {
    let updated = user_api::update_avatar(db, id, avatar_url).await?;

    cache_evict(cache, &keys::user(id)).await;
    cache_evict(cache, &keys::username(&updated.username)).await;

    Ok(updated)
}
