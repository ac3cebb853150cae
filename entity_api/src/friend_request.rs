use super::error::{EntityApiErrorKind, Error};
use chrono::Utc;
use entity::friend_requests::{ActiveModel, Column, Entity, Model};
use entity::request_status::RequestStatus;
use entity::Id;
use log::debug;
use sea_orm::{entity::prelude::*, Condition, ConnectionTrait, QueryOrder, Set};

/// Insert a new pending request. The partial unique index on the normalized
/// pair rejects a racing duplicate, surfacing as `UniqueViolation`.
pub async fn create(
    db: &impl ConnectionTrait,
    sender_id: Id,
    receiver_id: Id,
) -> Result<Model, Error> {
    debug!("New friend request to be inserted: {sender_id} -> {receiver_id}");

    let now = Utc::now();

    let request_active_model = ActiveModel {
        sender_id: Set(sender_id),
        receiver_id: Set(receiver_id),
        status: Set(RequestStatus::Pending),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(request_active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })
}

// Matches a request between the two users in either direction.
fn between(a: Id, b: Id) -> Condition {
    Condition::any()
        .add(
            Condition::all()
                .add(Column::SenderId.eq(a))
                .add(Column::ReceiverId.eq(b)),
        )
        .add(
            Condition::all()
                .add(Column::SenderId.eq(b))
                .add(Column::ReceiverId.eq(a)),
        )
}

/// A pending request between the pair, in either direction. At most one can
/// exist (enforced by the partial unique index).
pub async fn find_pending_between(
    db: &impl ConnectionTrait,
    a: Id,
    b: Id,
) -> Result<Option<Model>, Error> {
    let request = Entity::find()
        .filter(Column::Status.eq(RequestStatus::Pending))
        .filter(between(a, b))
        .one(db)
        .await?;

    Ok(request)
}

/// The accepted record between the pair, in either direction, if the two
/// users are currently friends.
pub async fn find_accepted_between(
    db: &impl ConnectionTrait,
    a: Id,
    b: Id,
) -> Result<Option<Model>, Error> {
    let request = Entity::find()
        .filter(Column::Status.eq(RequestStatus::Accepted))
        .filter(between(a, b))
        .one(db)
        .await?;

    Ok(request)
}

/// Compare-and-set transition out of `Pending`. The condition travels with
/// the UPDATE itself, so of two racing transitions exactly one matches a
/// row; the loser gets `RecordNotUpdated`.
pub async fn mark_status(
    db: &impl ConnectionTrait,
    id: Id,
    to: RequestStatus,
) -> Result<Model, Error> {
    debug!("Transitioning friend request {id} to {to}");

    let now = Utc::now();

    let result = Entity::update_many()
        .set(ActiveModel {
            status: Set(to),
            updated_at: Set(now.into()),
            ..Default::default()
        })
        .filter(Column::Id.eq(id))
        .filter(Column::Status.eq(RequestStatus::Pending))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotUpdated,
        });
    }

    find_by_id(db, id).await
}

pub async fn list_pending_received(
    db: &impl ConnectionTrait,
    user_id: Id,
) -> Result<Vec<Model>, Error> {
    let requests = Entity::find()
        .filter(Column::ReceiverId.eq(user_id))
        .filter(Column::Status.eq(RequestStatus::Pending))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?;

    Ok(requests)
}

pub async fn list_pending_sent(
    db: &impl ConnectionTrait,
    user_id: Id,
) -> Result<Vec<Model>, Error> {
    let requests = Entity::find()
        .filter(Column::SenderId.eq(user_id))
        .filter(Column::Status.eq(RequestStatus::Pending))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?;

    Ok(requests)
}

pub async fn delete(db: &impl ConnectionTrait, id: Id) -> Result<(), Error> {
    Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}
