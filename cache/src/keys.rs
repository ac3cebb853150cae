//! Key builders for every cached relationship view.
//!
//! All cache users go through these so that the writer invalidating a key
//! and the reader repopulating it can never disagree on its spelling.

/// Numeric user id, matching the entity layer's id type.
pub type Id = i64;

/// Full user snapshot: `user:{id}`
pub fn user(id: Id) -> String {
    format!("user:{id}")
}

/// Follower list view: `user:{id}:followers`
pub fn followers(id: Id) -> String {
    format!("user:{id}:followers")
}

/// Following list view: `user:{id}:following`
pub fn following(id: Id) -> String {
    format!("user:{id}:following")
}

/// Public profile looked up by username: `user:username:{username}`
pub fn username(username: &str) -> String {
    format!("user:username:{username}")
}

/// Name search results: `user:search:{term}`, term lowercased so lookups
/// differing only in case share one entry.
pub fn search(term: &str) -> String {
    format!("user:search:{}", term.to_lowercase())
}
