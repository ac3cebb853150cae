use crate::error::{Error, RelationshipErrorKind};
use crate::follows::Model;
use crate::{cache_evict, cache_fetch, cache_store, user};
use cache::{keys, CacheStore};
use entity::Id;
use entity_api::error::EntityApiErrorKind;
use entity_api::{follow as follow_api, user as user_api};
use log::debug;
use sea_orm::DatabaseConnection;

pub use entity_api::follow::FollowView;

/// Create a follow edge from the acting user to the target, invalidating the
/// two list views whose observable shape changed. Repeating the call fails
/// `DuplicateEdge`; a concurrent duplicate that slips past the pre-check is
/// normalized from the store's unique violation.
pub async fn follow(
    db: &DatabaseConnection,
    cache: &dyn CacheStore,
    follower_id: Id,
    following_id: Id,
) -> Result<Model, Error> {
    if follower_id == following_id {
        return Err(Error::relationship(RelationshipErrorKind::SelfReference));
    }

    let _actor = user::resolve_approved_actor(db, follower_id).await?;
    let _target = user_api::find_by_id(db, following_id).await?;

    if follow_api::find_edge(db, follower_id, following_id)
        .await?
        .is_some()
    {
        return Err(Error::relationship(RelationshipErrorKind::DuplicateEdge));
    }

    let edge = follow_api::create(db, follower_id, following_id)
        .await
        .map_err(|err| match err.error_kind {
            EntityApiErrorKind::UniqueViolation => {
                Error::relationship(RelationshipErrorKind::DuplicateEdge)
            }
            _ => err.into(),
        })?;

    // The write is committed; now the stale list views may be dropped.
    cache_evict(cache, &keys::following(follower_id)).await;
    cache_evict(cache, &keys::followers(following_id)).await;
    debug!("Invalidated follow list views for {follower_id} and {following_id}");

    Ok(edge)
}

/// Remove the follow edge, invalidating the same two list views. Fails
/// `NotFound` when no edge exists.
pub async fn unfollow(
    db: &DatabaseConnection,
    cache: &dyn CacheStore,
    follower_id: Id,
    following_id: Id,
) -> Result<(), Error> {
    let _actor = user::resolve_approved_actor(db, follower_id).await?;

    follow_api::delete(db, follower_id, following_id).await?;

    cache_evict(cache, &keys::following(follower_id)).await;
    cache_evict(cache, &keys::followers(following_id)).await;
    debug!("Invalidated follow list views for {follower_id} and {following_id}");

    Ok(())
}

/// Read-through follower list under `user:{id}:followers`. On a miss the
/// user id is validated against the store before the view is computed.
pub async fn get_followers(
    db: &DatabaseConnection,
    cache: &dyn CacheStore,
    user_id: Id,
) -> Result<Vec<FollowView>, Error> {
    let key = keys::followers(user_id);

    if let Some(views) = cache_fetch::<Vec<FollowView>>(cache, &key).await {
        return Ok(views);
    }

    let _user = user_api::find_by_id(db, user_id).await?;

    let views: Vec<FollowView> = follow_api::followers_of(db, user_id)
        .await?
        .into_iter()
        .map(FollowView::from)
        .collect();
    debug!("Fetched followers of user:{user_id} from store");

    cache_store(cache, &key, &views).await;
    Ok(views)
}

/// Read-through following list under `user:{id}:following`.
pub async fn get_following(
    db: &DatabaseConnection,
    cache: &dyn CacheStore,
    user_id: Id,
) -> Result<Vec<FollowView>, Error> {
    let key = keys::following(user_id);

    if let Some(views) = cache_fetch::<Vec<FollowView>>(cache, &key).await {
        return Ok(views);
    }

    let _user = user_api::find_by_id(db, user_id).await?;

    let views: Vec<FollowView> = follow_api::following_of(db, user_id)
        .await?
        .into_iter()
        .map(FollowView::from)
        .collect();
    debug!("Fetched following of user:{user_id} from store");

    cache_store(cache, &key, &views).await;
    Ok(views)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::DomainErrorKind;
    use crate::users;
    use cache::{CacheStore, InMemoryCache};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

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

    fn test_edge(id: Id, follower_id: Id, following_id: Id) -> Model {
        Model {
            id,
            follower_id,
            following_id,
            created_at: chrono::Utc::now().into(),
        }
    }

    fn relationship_error(result: Result<impl std::fmt::Debug, Error>) -> RelationshipErrorKind {
        match result.unwrap_err().error_kind {
            DomainErrorKind::Relationship(kind) => kind,
            other => panic!("expected relationship error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn follow_rejects_self_reference_before_touching_the_store() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let cache = InMemoryCache::new();

        let result = follow(&db, &cache, 1, 1).await;

        assert_eq!(
            relationship_error(result),
            RelationshipErrorKind::SelfReference
        );
    }

    #[tokio::test]
    async fn follow_creates_the_edge_and_invalidates_both_list_views() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![test_user(10, "ada")]])
            .append_query_results(vec![vec![test_user(20, "berta")]])
            .append_query_results::<Model, _, _>(vec![vec![]])
            .append_query_results(vec![vec![test_edge(1, 10, 20)]])
            .into_connection();

        let cache = InMemoryCache::new();
        crate::cache_store(&cache, &keys::following(10), &Vec::<FollowView>::new()).await;
        crate::cache_store(&cache, &keys::followers(20), &Vec::<FollowView>::new()).await;
        crate::cache_store(&cache, &keys::followers(10), &Vec::<FollowView>::new()).await;

        let edge = follow(&db, &cache, 10, 20).await.unwrap();

        assert_eq!(edge.follower_id, 10);
        assert_eq!(cache.get(&keys::following(10)).await.unwrap(), None);
        assert_eq!(cache.get(&keys::followers(20)).await.unwrap(), None);
        // Unaffected keys are left alone.
        assert!(cache.get(&keys::followers(10)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn follow_fails_with_duplicate_edge_when_already_following() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![test_user(10, "ada")]])
            .append_query_results(vec![vec![test_user(20, "berta")]])
            .append_query_results(vec![vec![test_edge(1, 10, 20)]])
            .into_connection();
        let cache = InMemoryCache::new();

        let result = follow(&db, &cache, 10, 20).await;

        assert_eq!(
            relationship_error(result),
            RelationshipErrorKind::DuplicateEdge
        );
    }

    #[tokio::test]
    async fn follow_fails_not_found_for_a_missing_target() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![test_user(10, "ada")]])
            .append_query_results::<users::Model, _, _>(vec![vec![]])
            .into_connection();
        let cache = InMemoryCache::new();

        let result = follow(&db, &cache, 10, 404).await;

        assert_eq!(relationship_error(result), RelationshipErrorKind::NotFound);
    }

    #[tokio::test]
    async fn unfollow_fails_not_found_when_no_edge_exists() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![test_user(10, "ada")]])
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let cache = InMemoryCache::new();

        let result = unfollow(&db, &cache, 10, 20).await;

        assert_eq!(relationship_error(result), RelationshipErrorKind::NotFound);
    }

    #[tokio::test]
    async fn followers_read_through_caches_then_recomputes_after_unfollow() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // First read (miss): user check, edges, batch users.
            .append_query_results(vec![vec![test_user(20, "berta")]])
            .append_query_results(vec![vec![test_edge(1, 10, 20)]])
            .append_query_results(vec![vec![test_user(10, "ada")]])
            // Unfollow: actor check, then the delete (exec below).
            .append_query_results(vec![vec![test_user(10, "ada")]])
            // Third read (miss again): user check, now-empty edges.
            .append_query_results(vec![vec![test_user(20, "berta")]])
            .append_query_results::<Model, _, _>(vec![vec![]])
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let cache = InMemoryCache::new();

        let first = get_followers(&db, &cache, 20).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].username, "ada");

        // Second read is served from the cache: no store results are left
        // for it, so reaching the database would fail the call.
        let second = get_followers(&db, &cache, 20).await.unwrap();
        assert_eq!(second, first);

        unfollow(&db, &cache, 10, 20).await.unwrap();
        assert_eq!(cache.get(&keys::followers(20)).await.unwrap(), None);

        let third = get_followers(&db, &cache, 20).await.unwrap();
        assert!(third.is_empty());
    }
}
