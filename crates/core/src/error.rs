//! Typed error enum for the core crate.

use thiserror::Error;

/// Errors raised while building or parsing core domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Page number below 1 or zero limit. Caller error, never sent to the server.
    #[error("invalid page request: page={page}, limit={limit}")]
    InvalidPageRequest { page: i64, limit: i64 },

    /// Resource namespace that no registered resource answers to.
    #[error("unknown resource: {0}")]
    UnknownResource(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
