//! Error types for the cache layer.
use std::error::Error as StdError;
use std::fmt;

/// Errors while talking to a cache backend. Callers treat the cache as
/// advisory, so these are logged and absorbed at the call site rather than
/// failing the surrounding operation.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: CacheErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum CacheErrorKind {
    // The backend rejected or failed the command
    Backend,
    // Other errors
    Other,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Cache Error: {:?}", self)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: CacheErrorKind::Backend,
        }
    }
}
