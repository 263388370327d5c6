//! Typed error enum for the query layer.

use std::sync::Arc;

use leadsync_client::ClientError;
use leadsync_core::CoreError;
use thiserror::Error;

use crate::list_query::QueryStatus;

/// Errors surfaced by list queries and views.
///
/// Cloneable so one failed fetch can be handed to every coalesced caller.
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// Page below 1 or zero limit.
    #[error(transparent)]
    InvalidRequest(#[from] CoreError),

    /// The fetch reached the client and failed there.
    #[error("fetch failed: {0}")]
    Fetch(Arc<ClientError>),

    /// A cache entry holds a page of a different item type than requested.
    #[error("cached value for {key} has an unexpected type")]
    TypeMismatch { key: String },

    #[error("invalid query transition: {from:?} -> {to:?}")]
    InvalidTransition { from: QueryStatus, to: QueryStatus },
}

impl QueryError {
    /// Underlying client error, when the failure came from the network.
    #[must_use]
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            Self::Fetch(e) => Some(e),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.client_error().is_some_and(ClientError::is_transient)
    }

    /// Text a view can render.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Fetch(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

impl From<ClientError> for QueryError {
    fn from(err: ClientError) -> Self {
        Self::Fetch(Arc::new(err))
    }
}
