use super::error::{EntityApiErrorKind, Error};
use chrono::Utc;
use entity::follows::{ActiveModel, Column, Entity, Model};
use entity::{users, Id};
use log::debug;
use sea_orm::{entity::prelude::*, ConnectionTrait, PaginatorTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

/// The projection of a follower/following entry that read paths return and
/// the cache layer snapshots under `user:{id}:followers` / `:following`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FollowView {
    pub username: String,
    pub email: String,
    pub is_approved: bool,
}

impl From<users::Model> for FollowView {
    fn from(user: users::Model) -> Self {
        Self {
            username: user.username,
            email: user.email,
            is_approved: user.is_approved,
        }
    }
}

/// Insert a new follow edge. A racing duplicate is rejected by the unique
/// index on `(follower_id, following_id)` and surfaces as `UniqueViolation`.
pub async fn create(
    db: &impl ConnectionTrait,
    follower_id: Id,
    following_id: Id,
) -> Result<Model, Error> {
    debug!("New follow edge to be inserted: {follower_id} -> {following_id}");

    let now = Utc::now();

    let follow_active_model = ActiveModel {
        follower_id: Set(follower_id),
        following_id: Set(following_id),
        created_at: Set(now.into()),
        ..Default::default()
    };

    Ok(follow_active_model.insert(db).await?)
}

pub async fn find_edge(
    db: &impl ConnectionTrait,
    follower_id: Id,
    following_id: Id,
) -> Result<Option<Model>, Error> {
    let edge = Entity::find()
        .filter(Column::FollowerId.eq(follower_id))
        .filter(Column::FollowingId.eq(following_id))
        .one(db)
        .await?;

    Ok(edge)
}

pub async fn delete(
    db: &impl ConnectionTrait,
    follower_id: Id,
    following_id: Id,
) -> Result<(), Error> {
    let result = Entity::delete_many()
        .filter(Column::FollowerId.eq(follower_id))
        .filter(Column::FollowingId.eq(following_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        });
    }

    Ok(())
}

/// Users who follow `user_id`, in edge-creation order.
pub async fn followers_of(
    db: &impl ConnectionTrait,
    user_id: Id,
) -> Result<Vec<users::Model>, Error> {
    let edges = Entity::find()
        .filter(Column::FollowingId.eq(user_id))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?;

    let follower_ids: Vec<Id> = edges.iter().map(|edge| edge.follower_id).collect();
    batch_load_users(db, &follower_ids).await
}

/// Users `user_id` follows, in edge-creation order.
pub async fn following_of(
    db: &impl ConnectionTrait,
    user_id: Id,
) -> Result<Vec<users::Model>, Error> {
    let edges = Entity::find()
        .filter(Column::FollowerId.eq(user_id))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?;

    let following_ids: Vec<Id> = edges.iter().map(|edge| edge.following_id).collect();
    batch_load_users(db, &following_ids).await
}

pub async fn count_followers(db: &impl ConnectionTrait, user_id: Id) -> Result<u64, Error> {
    Ok(Entity::find()
        .filter(Column::FollowingId.eq(user_id))
        .count(db)
        .await?)
}

pub async fn count_following(db: &impl ConnectionTrait, user_id: Id) -> Result<u64, Error> {
    Ok(Entity::find()
        .filter(Column::FollowerId.eq(user_id))
        .count(db)
        .await?)
}

/// Batch load users by id, preserving the order of `ids`.
async fn batch_load_users(
    db: &impl ConnectionTrait,
    ids: &[Id],
) -> Result<Vec<users::Model>, Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut by_id: HashMap<Id, users::Model> = users::Entity::find()
        .filter(users::Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await?
        .into_iter()
        .map(|user| (user.id, user))
        .collect();

    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction};

    fn test_edge(id: Id, follower_id: Id, following_id: Id) -> Model {
        Model {
            id,
            follower_id,
            following_id,
            created_at: chrono::Utc::now().into(),
        }
    }

    fn test_user(id: Id, username: &str) -> users::Model {
        let now = chrono::Utc::now();
        users::Model {
            id,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            first_name: None,
            last_name: None,
            bio: None,
            avatar_url: None,
            is_approved: true,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_returns_the_new_follow_edge() -> Result<(), Error> {
        let edge = test_edge(1, 10, 20);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![edge.clone()]])
            .into_connection();

        let created = create(&db, 10, 20).await?;

        assert_eq!(created.follower_id, 10);
        assert_eq!(created.following_id, 20);

        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_a_single_edge() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        delete(&db, 10, 20).await?;

        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"DELETE FROM "social_platform"."follows" WHERE "follows"."follower_id" = $1 AND "follows"."following_id" = $2"#,
                [10i64.into(), 20i64.into()]
            )]
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_returns_record_not_found_when_no_edge_exists() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = delete(&db, 10, 20).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }

    #[tokio::test]
    async fn followers_of_returns_follower_users_in_edge_order() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![test_edge(1, 30, 10), test_edge(2, 20, 10)]])
            .append_query_results(vec![vec![test_user(20, "berta"), test_user(30, "carl")]])
            .into_connection();

        let followers = followers_of(&db, 10).await?;

        // Edge order (by created_at), not the order the user query returned.
        assert_eq!(followers.len(), 2);
        assert_eq!(followers[0].id, 30);
        assert_eq!(followers[1].id, 20);

        Ok(())
    }

    #[tokio::test]
    async fn followers_of_returns_empty_for_user_with_no_followers() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<Model, _, _>(vec![vec![]])
            .into_connection();

        let followers = followers_of(&db, 10).await?;

        assert!(followers.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn following_of_returns_followed_users() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![test_edge(1, 10, 20)]])
            .append_query_results(vec![vec![test_user(20, "berta")]])
            .into_connection();

        let following = following_of(&db, 10).await?;

        assert_eq!(following.len(), 1);
        assert_eq!(following[0].id, 20);

        Ok(())
    }
}
