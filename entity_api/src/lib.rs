pub use entity::{follows, friend_requests, request_status, users, Id};

pub mod error;
pub mod follow;
pub mod friend_request;
pub mod user;
