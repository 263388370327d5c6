//! Brings cached list pages back in line with the server after a mutation.

use std::sync::Arc;

use leadsync_core::{Pagination, ResourceName};

use crate::cache::QueryClient;

/// Invalidates a resource's pages after a successful mutation.
///
/// Scoped to one namespace: reconciling `labels` never touches `campaigns`.
#[derive(Debug, Clone)]
pub struct Reconciler {
    client: Arc<QueryClient>,
}

impl Reconciler {
    #[must_use]
    pub fn new(client: Arc<QueryClient>) -> Self {
        Self { client }
    }

    /// Marks every cached page of `namespace` stale. Returns the number of pages hit.
    pub fn on_mutation_success(&self, namespace: ResourceName) -> usize {
        let invalidated = self.client.invalidate(namespace);
        tracing::debug!(resource = %namespace, pages = invalidated, "reconciled after mutation");
        invalidated
    }
}

/// Page a view should move to when the one it shows no longer exists.
///
/// `None` when `pagination` describes a page that exists (or the collection is
/// empty and the view is already on page 1).
#[must_use]
pub fn clamp_target(pagination: &Pagination) -> Option<u32> {
    if pagination.is_past_end() {
        Some(pagination.clamp_page(pagination.current_page))
    } else {
        None
    }
}
