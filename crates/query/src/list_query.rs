//! One paginated list bound to a resource and a `(page, limit)` pair.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use leadsync_client::ResourceApi;
use leadsync_core::{Page, PageRequest, Pagination, QueryKey, Resource};

use crate::cache::QueryClient;
use crate::error::QueryError;

/// Lifecycle of a list query.
///
/// `Idle → Loading → {Success | Error}`, `Success → Loading`, `Error → Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

impl QueryStatus {
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle | Self::Success | Self::Error, Self::Loading)
                | (Self::Loading, Self::Success | Self::Error)
        )
    }
}

/// Point-in-time view of a query, what a table renders.
#[derive(Debug, Clone)]
pub struct QueryResult<T> {
    pub request: PageRequest,
    pub status: QueryStatus,
    /// Last page loaded for `request`. Kept while a refetch is running.
    pub data: Option<Arc<Page<T>>>,
    pub error: Option<QueryError>,
}

impl<T> QueryResult<T> {
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.data.as_ref().map_or(&[], |page| page.items.as_slice())
    }

    #[must_use]
    pub fn pagination(&self) -> Option<Pagination> {
        self.data.as_ref().map(|page| page.pagination)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }
}

struct ListState<T> {
    request: PageRequest,
    status: QueryStatus,
    data: Option<Arc<Page<T>>>,
    error: Option<QueryError>,
    /// Bumped on every load and parameter change; a load applies only if its ticket is current.
    ticket: u64,
    /// Ticket of the load currently outstanding for `request`, if any.
    loading: Option<u64>,
}

impl<T> ListState<T> {
    /// Status for the current request when nothing is being fetched for it.
    fn settled_status(&self) -> QueryStatus {
        if self.data.is_some() { QueryStatus::Success } else { QueryStatus::Idle }
    }

    fn transition(&mut self, next: QueryStatus) -> Result<(), QueryError> {
        if self.status == next && next == QueryStatus::Loading {
            return Ok(());
        }
        if !self.status.can_transition_to(next) {
            tracing::warn!(from = ?self.status, to = ?next, "rejected query transition");
            return Err(QueryError::InvalidTransition { from: self.status, to: next });
        }
        self.status = next;
        Ok(())
    }
}

/// List query for resource `R`. Reads go through the shared [`QueryClient`].
pub struct ListQuery<R: Resource> {
    client: Arc<QueryClient>,
    api: Arc<dyn ResourceApi<R>>,
    state: Mutex<ListState<R::Item>>,
}

impl<R: Resource> std::fmt::Debug for ListQuery<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("ListQuery")
            .field("resource", &R::NAME)
            .field("request", &state.request)
            .field("status", &state.status)
            .finish()
    }
}

impl<R: Resource> ListQuery<R> {
    #[must_use]
    pub fn new(
        client: Arc<QueryClient>,
        api: Arc<dyn ResourceApi<R>>,
        request: PageRequest,
    ) -> Self {
        let data = client.peek(QueryKey::new(R::NAME, request));
        Self {
            client,
            api,
            state: Mutex::new(ListState {
                request,
                status: QueryStatus::Idle,
                data,
                error: None,
                ticket: 0,
                loading: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ListState<R::Item>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn key(&self) -> QueryKey {
        QueryKey::new(R::NAME, self.lock().request)
    }

    #[must_use]
    pub fn request(&self) -> PageRequest {
        self.lock().request
    }

    #[must_use]
    pub fn status(&self) -> QueryStatus {
        self.lock().status
    }

    /// True when the cached page for the current key must be refetched before it is trusted.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.client.is_stale(self.key())
    }

    #[must_use]
    pub fn snapshot(&self) -> QueryResult<R::Item> {
        let state = self.lock();
        QueryResult {
            request: state.request,
            status: state.status,
            data: state.data.clone(),
            error: state.error.clone(),
        }
    }

    /// Switches to another `(page, limit)`. Any load still running for the old
    /// parameters is discarded when it lands. Does not fetch.
    ///
    /// The lifecycle restarts for the new key: `Success` when a cached page
    /// exists for it, `Idle` otherwise. The next [`load`](Self::load) moves it
    /// to `Loading`.
    pub fn set_request(&self, request: PageRequest) {
        let mut state = self.lock();
        if state.request == request {
            return;
        }
        state.request = request;
        state.ticket = state.ticket.saturating_add(1);
        state.loading = None;
        state.data = self.client.peek(QueryKey::new(R::NAME, request));
        state.error = None;
        state.status = state.settled_status();
    }

    /// Loads the current page (from cache when fresh) and records the outcome.
    ///
    /// The returned value is this call's own result; it is applied to the
    /// query only if no newer load or parameter change happened meanwhile.
    pub async fn load(&self) -> Result<Arc<Page<R::Item>>, QueryError> {
        let (request, ticket) = {
            let mut state = self.lock();
            state.transition(QueryStatus::Loading)?;
            state.ticket = state.ticket.saturating_add(1);
            state.loading = Some(state.ticket);
            (state.request, state.ticket)
        };

        let key = QueryKey::new(R::NAME, request);
        let api = Arc::clone(&self.api);
        let result = self
            .client
            .fetch(key, move || async move { api.fetch_page(request).await })
            .await;

        let mut state = self.lock();
        if state.ticket != ticket {
            tracing::debug!(%key, "dropping result of superseded load");
            // A newer load settles the state itself; otherwise nothing is in flight.
            if state.loading.is_none() && state.status == QueryStatus::Loading {
                state.status = state.settled_status();
            }
            return result;
        }
        state.loading = None;
        match &result {
            Ok(page) => {
                state.transition(QueryStatus::Success)?;
                state.data = Some(Arc::clone(page));
                state.error = None;
            },
            Err(e) => {
                state.transition(QueryStatus::Error)?;
                state.error = Some(e.clone());
                tracing::debug!(%key, error = %e, "list query failed");
            },
        }
        result
    }

    /// Loads again after an error. Same as [`load`](Self::load); named for call sites.
    pub async fn retry(&self) -> Result<Arc<Page<R::Item>>, QueryError> {
        self.load().await
    }
}
