//! Page-number pagination as reported by the backend.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use crate::error::{CoreError, Result};

/// A validated `(page, limit)` pair. `page` is 1-based.
///
/// Deserialization goes through [`PageRequest::new`], so a decoded value is
/// always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPageRequest")]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

#[derive(Deserialize)]
struct RawPageRequest {
    page: i64,
    limit: i64,
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = CoreError;

    fn try_from(raw: RawPageRequest) -> Result<Self> {
        Self::new(raw.page, raw.limit)
    }
}

impl PageRequest {
    /// Validates `page >= 1` and `limit > 0`; caps `limit` at [`MAX_PAGE_LIMIT`].
    pub fn new(page: i64, limit: i64) -> Result<Self> {
        if page < 1 || limit < 1 {
            return Err(CoreError::InvalidPageRequest { page, limit });
        }
        let page = u32::try_from(page).map_err(|_| CoreError::InvalidPageRequest { page, limit })?;
        let limit = u32::try_from(limit.min(i64::from(MAX_PAGE_LIMIT)))
            .map_err(|_| CoreError::InvalidPageRequest { page: i64::from(page), limit })?;
        Ok(Self { page, limit })
    }

    #[must_use]
    pub const fn first() -> Self {
        Self { page: 1, limit: DEFAULT_PAGE_LIMIT }
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Same limit, different page. `page` is clamped to at least 1.
    #[must_use]
    pub fn with_page(self, page: u32) -> Self {
        Self { page: page.max(1), ..self }
    }

    /// Zero-based offset of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.limit as usize)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// Server-reported window metadata for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total_items: u64,
    pub total_pages: u32,
    pub current_page: u32,
    pub limit: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    /// Derives a consistent window for `total_items` split into pages of `request.limit()`.
    ///
    /// `current_page` echoes the request even when it lies past the last page.
    #[must_use]
    pub fn compute(total_items: u64, request: PageRequest) -> Self {
        let limit = u64::from(request.limit());
        let total_pages = u32::try_from(total_items.div_ceil(limit)).unwrap_or(u32::MAX);
        let current_page = request.page();
        Self {
            total_items,
            total_pages,
            current_page,
            limit: request.limit(),
            has_next_page: current_page < total_pages,
            has_prev_page: current_page > 1,
        }
    }

    /// Checks the window invariants against the number of items actually returned.
    #[must_use]
    pub fn is_consistent(&self, items_len: usize) -> bool {
        self.current_page >= 1
            && items_len <= self.limit as usize
            && self.has_next_page == (self.current_page < self.total_pages)
            && self.has_prev_page == (self.current_page > 1)
    }

    /// Nearest page that exists: `min(page, max(total_pages, 1))`.
    #[must_use]
    pub fn clamp_page(&self, page: u32) -> u32 {
        page.min(self.total_pages.max(1)).max(1)
    }

    /// True when the current page lies past the last one.
    #[must_use]
    pub fn is_past_end(&self) -> bool {
        self.current_page > self.total_pages.max(1)
    }
}

/// One page of a resource collection, items in server order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Empty page for a collection with no items at all.
    #[must_use]
    pub fn empty(request: PageRequest) -> Self {
        Self { items: Vec::new(), pagination: Pagination::compute(0, request) }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
