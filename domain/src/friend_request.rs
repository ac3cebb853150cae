use crate::error::{Error, RelationshipErrorKind};
use crate::friend_requests::Model;
use crate::user;
use entity::request_status::RequestStatus;
use entity::Id;
use entity_api::error::EntityApiErrorKind;
use entity_api::{friend_request as friend_request_api, user as user_api};
use events::{DomainEvent, EventPublisher};
use log::debug;
use sea_orm::DatabaseConnection;

/// Create a pending request from the acting user to the receiver and notify
/// the receiver. A pending request between the pair in either direction
/// blocks a new one until resolved; a racing duplicate that slips past the
/// pre-check is normalized from the store's unique violation.
pub async fn send_request(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    sender_id: Id,
    receiver_id: Id,
) -> Result<Model, Error> {
    if sender_id == receiver_id {
        return Err(Error::relationship(RelationshipErrorKind::SelfReference));
    }

    let _sender = user::resolve_approved_actor(db, sender_id).await?;
    let _receiver = user_api::find_by_id(db, receiver_id).await?;

    if friend_request_api::find_pending_between(db, sender_id, receiver_id)
        .await?
        .is_some()
    {
        return Err(Error::relationship(RelationshipErrorKind::DuplicatePending));
    }

    let request = friend_request_api::create(db, sender_id, receiver_id)
        .await
        .map_err(|err| match err.error_kind {
            EntityApiErrorKind::UniqueViolation => {
                Error::relationship(RelationshipErrorKind::DuplicatePending)
            }
            _ => err.into(),
        })?;

    debug!(
        "Friend request {} created: {sender_id} -> {receiver_id}",
        request.id
    );

    publisher
        .publish(DomainEvent::FriendRequestReceived {
            request_id: request.id,
            sender_id: request.sender_id,
            receiver_id: request.receiver_id,
        })
        .await;

    Ok(request)
}

/// Accept a pending request. Only the receiver may do this, and the
/// pending -> accepted transition happens exactly once: the status check
/// and the write are a single conditional update, so the loser of a race
/// observes `InvalidTransition`.
pub async fn accept_request(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    request_id: Id,
    acting_user_id: Id,
) -> Result<Model, Error> {
    resolve(db, publisher, request_id, acting_user_id, RequestStatus::Accepted).await
}

/// Reject a pending request, under the same authorization and atomicity
/// rules as `accept_request`.
pub async fn reject_request(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    request_id: Id,
    acting_user_id: Id,
) -> Result<Model, Error> {
    resolve(db, publisher, request_id, acting_user_id, RequestStatus::Rejected).await
}

async fn resolve(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    request_id: Id,
    acting_user_id: Id,
    to: RequestStatus,
) -> Result<Model, Error> {
    let _actor = user::resolve_approved_actor(db, acting_user_id).await?;

    let request = friend_request_api::find_by_id(db, request_id).await?;
    if request.receiver_id != acting_user_id {
        return Err(Error::relationship(RelationshipErrorKind::Forbidden));
    }

    // RecordNotUpdated from the conditional update means the request left
    // Pending between our read and the write; From maps it to InvalidTransition.
    let updated = friend_request_api::mark_status(db, request_id, to).await?;

    debug!("Friend request {request_id} transitioned to {to}");

    let event = match to {
        RequestStatus::Accepted => DomainEvent::FriendRequestAccepted {
            request_id: updated.id,
            sender_id: updated.sender_id,
            receiver_id: updated.receiver_id,
        },
        _ => DomainEvent::FriendRequestRejected {
            request_id: updated.id,
            sender_id: updated.sender_id,
            receiver_id: updated.receiver_id,
        },
    };
    publisher.publish(event).await;

    Ok(updated)
}

/// Dissolve an accepted friendship with the named counterpart: the terminal
/// accepted record (in either direction) is deleted outright, and both
/// parties are notified.
pub async fn remove_friend(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    acting_user_id: Id,
    counterpart_username: &str,
) -> Result<(), Error> {
    let _actor = user::resolve_approved_actor(db, acting_user_id).await?;

    let counterpart = user_api::find_by_username(db, counterpart_username).await?;
    if counterpart.id == acting_user_id {
        return Err(Error::relationship(RelationshipErrorKind::SelfReference));
    }

    let accepted = friend_request_api::find_accepted_between(db, acting_user_id, counterpart.id)
        .await?
        .ok_or_else(|| Error::relationship(RelationshipErrorKind::NotFound))?;

    friend_request_api::delete(db, accepted.id).await?;

    debug!(
        "Friendship dissolved between {acting_user_id} and {}",
        counterpart.id
    );

    publisher
        .publish(DomainEvent::FriendRemoved {
            user_id: acting_user_id,
            counterpart_id: counterpart.id,
        })
        .await;

    Ok(())
}

/// Pending requests addressed to the user.
pub async fn list_pending_received(
    db: &DatabaseConnection,
    user_id: Id,
) -> Result<Vec<Model>, Error> {
    let _user = user_api::find_by_id(db, user_id).await?;
    Ok(friend_request_api::list_pending_received(db, user_id).await?)
}

/// Pending requests the user has sent and that are still unresolved.
pub async fn list_pending_sent(db: &DatabaseConnection, user_id: Id) -> Result<Vec<Model>, Error> {
    let _user = user_api::find_by_id(db, user_id).await?;
    Ok(friend_request_api::list_pending_sent(db, user_id).await?)
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
    use async_trait::async_trait;
    use events::EventHandler;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::{Arc, Mutex};

    struct RecordingHandler {
        seen: Mutex<Vec<DomainEvent>>,
    }

    impl RecordingHandler {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(Vec::new()),
            })
        }

        fn events(&self) -> Vec<DomainEvent> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EventHandler for RecordingHandler {
        async fn handle(&self, event: &DomainEvent) {
            self.seen.lock().unwrap().push(event.clone());
        }
    }

    fn test_user(id: Id, username: &str, is_approved: bool) -> users::Model {
        let now = chrono::Utc::now();
        users::Model {
            id,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            first_name: None,
            last_name: None,
            bio: None,
            avatar_url: None,
            is_approved,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn test_request(id: Id, sender_id: Id, receiver_id: Id, status: RequestStatus) -> Model {
        let now = chrono::Utc::now();
        Model {
            id,
            sender_id,
            receiver_id,
            status,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn relationship_error(result: Result<impl std::fmt::Debug, Error>) -> RelationshipErrorKind {
        match result.unwrap_err().error_kind {
            DomainErrorKind::Relationship(kind) => kind,
            other => panic!("expected relationship error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn send_request_rejects_self_reference() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let publisher = EventPublisher::new();

        let result = send_request(&db, &publisher, 1, 1).await;

        assert_eq!(
            relationship_error(result),
            RelationshipErrorKind::SelfReference
        );
    }

    #[tokio::test]
    async fn send_request_fails_not_found_for_missing_receiver() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![test_user(10, "ada", true)]])
            .append_query_results::<users::Model, _, _>(vec![vec![]])
            .into_connection();
        let publisher = EventPublisher::new();

        let result = send_request(&db, &publisher, 10, 404).await;

        assert_eq!(relationship_error(result), RelationshipErrorKind::NotFound);
    }

    #[tokio::test]
    async fn send_request_forbidden_for_unapproved_sender() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![test_user(10, "ada", false)]])
            .into_connection();
        let publisher = EventPublisher::new();

        let result = send_request(&db, &publisher, 10, 20).await;

        assert_eq!(relationship_error(result), RelationshipErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn send_request_blocks_a_pending_request_in_the_reverse_direction() {
        let handler = RecordingHandler::new();
        let publisher = EventPublisher::new().with_handler(handler.clone());

        // The existing pending request was sent 20 -> 10.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![test_user(10, "ada", true)]])
            .append_query_results(vec![vec![test_user(20, "berta", true)]])
            .append_query_results(vec![vec![test_request(7, 20, 10, RequestStatus::Pending)]])
            .into_connection();

        let result = send_request(&db, &publisher, 10, 20).await;

        assert_eq!(
            relationship_error(result),
            RelationshipErrorKind::DuplicatePending
        );
        assert!(handler.events().is_empty());
    }

    #[tokio::test]
    async fn send_request_persists_and_notifies_the_receiver() {
        let handler = RecordingHandler::new();
        let publisher = EventPublisher::new().with_handler(handler.clone());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![test_user(10, "ada", true)]])
            .append_query_results(vec![vec![test_user(20, "berta", true)]])
            .append_query_results::<Model, _, _>(vec![vec![]])
            .append_query_results(vec![vec![test_request(1, 10, 20, RequestStatus::Pending)]])
            .into_connection();

        let request = send_request(&db, &publisher, 10, 20).await.unwrap();

        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(
            handler.events(),
            vec![DomainEvent::FriendRequestReceived {
                request_id: 1,
                sender_id: 10,
                receiver_id: 20,
            }]
        );
    }

    #[tokio::test]
    async fn accept_request_by_a_non_receiver_fails_forbidden() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![test_user(30, "carl", true)]])
            .append_query_results(vec![vec![test_request(1, 10, 20, RequestStatus::Pending)]])
            .into_connection();
        let publisher = EventPublisher::new();

        let result = accept_request(&db, &publisher, 1, 30).await;

        assert_eq!(relationship_error(result), RelationshipErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn accept_request_fails_not_found_for_missing_request() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![test_user(20, "berta", true)]])
            .append_query_results::<Model, _, _>(vec![vec![]])
            .into_connection();
        let publisher = EventPublisher::new();

        let result = accept_request(&db, &publisher, 1, 20).await;

        assert_eq!(relationship_error(result), RelationshipErrorKind::NotFound);
    }

    #[tokio::test]
    async fn accept_request_transitions_and_notifies_both_parties() {
        let handler = RecordingHandler::new();
        let publisher = EventPublisher::new().with_handler(handler.clone());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![test_user(20, "berta", true)]])
            .append_query_results(vec![vec![test_request(1, 10, 20, RequestStatus::Pending)]])
            .append_query_results(vec![vec![test_request(1, 10, 20, RequestStatus::Accepted)]])
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let updated = accept_request(&db, &publisher, 1, 20).await.unwrap();

        assert_eq!(updated.status, RequestStatus::Accepted);
        assert_eq!(
            handler.events(),
            vec![DomainEvent::FriendRequestAccepted {
                request_id: 1,
                sender_id: 10,
                receiver_id: 20,
            }]
        );
    }

    #[tokio::test]
    async fn the_loser_of_a_transition_race_gets_invalid_transition_and_no_events() {
        let handler = RecordingHandler::new();
        let publisher = EventPublisher::new().with_handler(handler.clone());

        // The read still sees Pending, but by the time the conditional
        // update runs a concurrent call has already resolved the request.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![test_user(20, "berta", true)]])
            .append_query_results(vec![vec![test_request(1, 10, 20, RequestStatus::Pending)]])
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = reject_request(&db, &publisher, 1, 20).await;

        assert_eq!(
            relationship_error(result),
            RelationshipErrorKind::InvalidTransition
        );
        assert!(handler.events().is_empty());
    }

    #[tokio::test]
    async fn remove_friend_fails_not_found_without_an_accepted_record() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![test_user(10, "ada", true)]])
            .append_query_results(vec![vec![test_user(20, "berta", true)]])
            .append_query_results::<Model, _, _>(vec![vec![]])
            .into_connection();
        let publisher = EventPublisher::new();

        let result = remove_friend(&db, &publisher, 10, "berta").await;

        assert_eq!(relationship_error(result), RelationshipErrorKind::NotFound);
    }

    #[tokio::test]
    async fn remove_friend_deletes_the_accepted_record_and_notifies_both() {
        let handler = RecordingHandler::new();
        let publisher = EventPublisher::new().with_handler(handler.clone());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![test_user(10, "ada", true)]])
            .append_query_results(vec![vec![test_user(20, "berta", true)]])
            .append_query_results(vec![vec![test_request(1, 20, 10, RequestStatus::Accepted)]])
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        remove_friend(&db, &publisher, 10, "berta").await.unwrap();

        assert_eq!(
            handler.events(),
            vec![DomainEvent::FriendRemoved {
                user_id: 10,
                counterpart_id: 20,
            }]
        );
    }
}
