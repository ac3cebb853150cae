use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use domain::error::{
    DomainErrorKind, Error as DomainError, InternalErrorKind, RelationshipErrorKind,
};

extern crate log;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html#associatedconstant.UNPROCESSABLE_ENTITY
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.0.error_kind {
            DomainErrorKind::Relationship(relationship_error_kind) => {
                match relationship_error_kind {
                    RelationshipErrorKind::NotFound => {
                        (StatusCode::NOT_FOUND, "NOT FOUND").into_response()
                    }
                    RelationshipErrorKind::SelfReference => {
                        (StatusCode::BAD_REQUEST, "BAD REQUEST").into_response()
                    }
                    RelationshipErrorKind::DuplicateEdge
                    | RelationshipErrorKind::DuplicatePending => {
                        (StatusCode::CONFLICT, "CONFLICT").into_response()
                    }
                    RelationshipErrorKind::Forbidden => {
                        (StatusCode::FORBIDDEN, "FORBIDDEN").into_response()
                    }
                    RelationshipErrorKind::InvalidTransition => {
                        (StatusCode::CONFLICT, "CONFLICT").into_response()
                    }
                }
            }
            DomainErrorKind::Internal(internal_error_kind) => match internal_error_kind {
                InternalErrorKind::Entity(_) | InternalErrorKind::Other(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                }
            },
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
