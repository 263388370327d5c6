//! Cache identity of one fetched page.

use std::fmt;

use crate::pagination::PageRequest;
use crate::resource::ResourceName;

/// `(namespace, page, limit)`. Equal keys are the same cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub namespace: ResourceName,
    pub request: PageRequest,
}

impl QueryKey {
    #[must_use]
    pub const fn new(namespace: ResourceName, request: PageRequest) -> Self {
        Self { namespace, request }
    }

    /// Prefix match used by invalidation.
    #[must_use]
    pub fn belongs_to(&self, namespace: ResourceName) -> bool {
        self.namespace == namespace
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}?page={}&limit={}", self.namespace, self.request.page(), self.request.limit())
    }
}
