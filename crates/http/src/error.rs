//! Typed error enum for the in-memory store.

use leadsync_core::{CoreError, ResourceName};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{resource} '{id}' not found")]
    NotFound { resource: ResourceName, id: String },

    /// Payload rejected; the message is shown to the user verbatim.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    InvalidRequest(#[from] CoreError),
}
