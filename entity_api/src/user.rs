use super::error::{EntityApiErrorKind, Error};
use chrono::Utc;
use entity::users::{ActiveModel, Column, Entity, Model};
use entity::Id;
use sea_orm::sea_query::{extension::postgres::PgExpr, Expr};
use sea_orm::{entity::prelude::*, Condition, ConnectionTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })
}

pub async fn find_by_username(db: &impl ConnectionTrait, username: &str) -> Result<Model, Error> {
    Entity::find()
        .filter(Column::Username.eq(username))
        .one(db)
        .await?
        .ok_or_else(|| Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        })
}

/// Case-insensitive contains-match on first or last name, ordered by
/// username for a stable result page.
pub async fn search_by_name(db: &impl ConnectionTrait, term: &str) -> Result<Vec<Model>, Error> {
    let pattern = format!("%{term}%");

    let users = Entity::find()
        .filter(
            Condition::any()
                .add(Expr::col((Entity, Column::FirstName)).ilike(pattern.clone()))
                .add(Expr::col((Entity, Column::LastName)).ilike(pattern)),
        )
        .order_by_asc(Column::Username)
        .all(db)
        .await?;

    Ok(users)
}

/// Public profile summary with aggregate counts. This is the exact shape the
/// cache layer snapshots for `user:username:{..}` and `user:search:{..}` keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PublicProfile {
    pub id: Id,
    pub username: String,
    pub email: String,
    pub is_approved: bool,
    pub followers_count: u64,
    pub following_count: u64,
}

pub async fn public_profile(db: &impl ConnectionTrait, user: Model) -> Result<PublicProfile, Error> {
    let followers_count = super::follow::count_followers(db, user.id).await?;
    let following_count = super::follow::count_following(db, user.id).await?;

    Ok(PublicProfile {
        id: user.id,
        username: user.username,
        email: user.email,
        is_approved: user.is_approved,
        followers_count,
        following_count,
    })
}

/// Partial profile update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

pub async fn update_profile(
    db: &impl ConnectionTrait,
    id: Id,
    update: ProfileUpdate,
) -> Result<Model, Error> {
    let existing = find_by_id(db, id).await?;

    let mut user_active_model: ActiveModel = existing.into();
    if let Some(first_name) = update.first_name {
        user_active_model.first_name = Set(Some(first_name));
    }
    if let Some(last_name) = update.last_name {
        user_active_model.last_name = Set(Some(last_name));
    }
    if let Some(bio) = update.bio {
        user_active_model.bio = Set(Some(bio));
    }
    user_active_model.updated_at = Set(Utc::now().into());

    Ok(user_active_model.update(db).await?)
}

pub async fn update_avatar(
    db: &impl ConnectionTrait,
    id: Id,
    avatar_url: &str,
) -> Result<Model, Error> {
    let existing = find_by_id(db, id).await?;

    let mut user_active_model: ActiveModel = existing.into();
    user_active_model.avatar_url = Set(Some(avatar_url.to_string()));
    user_active_model.updated_at = Set(Utc::now().into());

    Ok(user_active_model.update(db).await?)
}
