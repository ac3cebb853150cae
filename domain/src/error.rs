//! Error types for the `domain` layer.
use entity_api::error::{EntityApiErrorKind, Error as EntityApiError};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. The intent is to translate errors between layers while maintaining
/// layer boundaries: `domain` depends on `entity_api`, and `web` depends on `domain`,
/// but `web` should not be dependent, directly, on `entity_api`. The various `error_kind`s
/// are ultimately used by `web` to return appropriate HTTP status codes to the client.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    /// A recoverable, caller-visible failure of a relationship operation.
    Relationship(RelationshipErrorKind),
    Internal(InternalErrorKind),
}

/// The structured failures a relationship mutation or read can report.
/// All of them are recoverable and none crash the process.
#[derive(Debug, PartialEq)]
pub enum RelationshipErrorKind {
    /// Missing user, request, or edge
    NotFound,
    /// Operation targets the acting user itself
    SelfReference,
    /// The follow edge already exists
    DuplicateEdge,
    /// A pending request already exists between the pair, in either direction
    DuplicatePending,
    /// Actor is not the authorized party for the operation
    Forbidden,
    /// Request was not pending when accept/reject was attempted
    InvalidTransition,
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Entity(EntityErrorKind),
    Other(String),
}

/// Enum representing the various kinds of entity errors that can bubble up from the "Entity"
/// layer (`entity_api` and `entity`). These errors are translated from the `entity_api` layer
/// and reduced to the subset that is relevant to the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum EntityErrorKind {
    Invalid,
    DbTransaction,
    Other(String),
}

impl Error {
    pub(crate) fn relationship(kind: RelationshipErrorKind) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Relationship(kind),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `entity_api` layer to the `domain` layer.
// Record lookups that miss and conditional updates that match no row map onto the
// caller-visible relationship kinds; everything else stays internal. UniqueViolation is
// deliberately NOT mapped here: only the calling operation knows whether it means
// DuplicateEdge or DuplicatePending, so each call site normalizes it before `?`.
impl From<EntityApiError> for Error {
    fn from(err: EntityApiError) -> Self {
        let error_kind = match err.error_kind {
            EntityApiErrorKind::RecordNotFound => {
                DomainErrorKind::Relationship(RelationshipErrorKind::NotFound)
            }
            EntityApiErrorKind::RecordNotUpdated => {
                DomainErrorKind::Relationship(RelationshipErrorKind::InvalidTransition)
            }
            EntityApiErrorKind::InvalidQueryTerm => {
                DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Invalid))
            }
            _ => DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Other(
                "EntityErrorKind".to_string(),
            ))),
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}
