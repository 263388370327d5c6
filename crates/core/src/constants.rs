//! Shared constants for leadsync.

/// Page size used when the caller does not specify one.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Largest page size a caller may request; larger values are capped.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Base URL of the backend when `LEADSYNC_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:37780";

/// Per-request timeout when `LEADSYNC_HTTP_TIMEOUT_SECS` is not set.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Age after which a cached page is refetched on next read.
pub const DEFAULT_STALE_TIME_SECS: u64 = 30;

/// Upper bound on cached pages before the oldest settled ones are evicted.
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 256;

/// Header carrying the active workspace on every dashboard call.
pub const WORKSPACE_HEADER: &str = "x-workspace-id";
