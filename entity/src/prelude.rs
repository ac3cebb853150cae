pub use super::follows::Entity as Follows;
pub use super::friend_requests::Entity as FriendRequests;
pub use super::users::Entity as Users;
