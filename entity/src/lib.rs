pub mod prelude;

pub mod follows;
pub mod friend_requests;
pub mod request_status;
pub mod users;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = i64;
