//! Request/query types (Deserialize)

use leadsync_core::{DEFAULT_PAGE_LIMIT, PageRequest};
use serde::Deserialize;

use crate::error::StoreError;

const fn default_page() -> i64 {
    1
}

const fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT as i64
}

#[derive(Debug, Deserialize)]
pub struct FetchQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl FetchQuery {
    pub fn page_request(&self) -> Result<PageRequest, StoreError> {
        Ok(PageRequest::new(self.page, self.limit)?)
    }
}

/// `PATCH /{resource}/edit` body: `{id, ...fields}`.
#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub id: String,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}
