//! Table-level binding: pagination controls and row actions over one list query.

use std::sync::{Arc, Mutex, PoisonError};

use leadsync_client::{ClientError, ResourceApi};
use leadsync_core::{MutationResponse, Page, PageRequest, Resource};
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::cache::{Invalidation, QueryClient};
use crate::error::QueryError;
use crate::list_query::{ListQuery, QueryResult};
use crate::mutation::{Mutation, MutationOp};
use crate::reconcile::{Reconciler, clamp_target};

/// Clamping retries before the view gives up and shows what it has.
const MAX_CLAMP_STEPS: usize = 3;

/// Enabled state of the pagination controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageControls {
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub can_prev: bool,
    pub can_next: bool,
}

/// Renders one page of `R` and routes row actions through [`Mutation`].
///
/// The view never edits its own items. After a mutation it relies on the
/// invalidation event and refetches the displayed page.
pub struct ListView<R: Resource> {
    query: ListQuery<R>,
    mutation: Mutation<R>,
    events: Mutex<broadcast::Receiver<Invalidation>>,
}

impl<R: Resource> std::fmt::Debug for ListView<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListView").field("query", &self.query).finish()
    }
}

impl<R: Resource> ListView<R> {
    #[must_use]
    pub fn new(
        client: Arc<QueryClient>,
        api: Arc<dyn ResourceApi<R>>,
        request: PageRequest,
    ) -> Self {
        let events = Mutex::new(client.subscribe());
        let mutation = Mutation::new(Arc::clone(&api), Reconciler::new(Arc::clone(&client)));
        let query = ListQuery::new(client, api, request);
        Self { query, mutation, events }
    }

    #[must_use]
    pub const fn query(&self) -> &ListQuery<R> {
        &self.query
    }

    #[must_use]
    pub fn snapshot(&self) -> QueryResult<R::Item> {
        self.query.snapshot()
    }

    /// Control state derived from the server's `hasPrevPage` / `hasNextPage`.
    /// Both are disabled until a page has loaded.
    #[must_use]
    pub fn controls(&self) -> PageControls {
        let snapshot = self.query.snapshot();
        let pagination = snapshot.pagination();
        PageControls {
            page: snapshot.request.page(),
            limit: snapshot.request.limit(),
            total_pages: pagination.map_or(0, |p| p.total_pages),
            can_prev: pagination.is_some_and(|p| p.has_prev_page),
            can_next: pagination.is_some_and(|p| p.has_next_page),
        }
    }

    /// Loads the current page, moving back to the last existing page if the
    /// current one disappeared.
    pub async fn open(&self) -> Result<Arc<Page<R::Item>>, QueryError> {
        let mut page = self.query.load().await?;
        for _ in 0..MAX_CLAMP_STEPS {
            let Some(target) = clamp_target(&page.pagination) else {
                break;
            };
            tracing::debug!(
                resource = %R::NAME,
                from = page.pagination.current_page,
                to = target,
                "page no longer exists, clamping"
            );
            self.query.set_request(self.query.request().with_page(target));
            page = self.query.load().await?;
        }
        Ok(page)
    }

    /// Returns `Ok(false)` without fetching when the control is disabled.
    pub async fn next_page(&self) -> Result<bool, QueryError> {
        let controls = self.controls();
        if !controls.can_next {
            return Ok(false);
        }
        self.go_to_page(i64::from(controls.page) + 1).await?;
        Ok(true)
    }

    /// Returns `Ok(false)` without fetching when the control is disabled.
    pub async fn prev_page(&self) -> Result<bool, QueryError> {
        let controls = self.controls();
        if !controls.can_prev {
            return Ok(false);
        }
        self.go_to_page(i64::from(controls.page) - 1).await?;
        Ok(true)
    }

    /// Jumps to `page`; pages below 1 are a caller error.
    pub async fn go_to_page(&self, page: i64) -> Result<Arc<Page<R::Item>>, QueryError> {
        let request = PageRequest::new(page, i64::from(self.query.request().limit()))?;
        self.query.set_request(request);
        self.open().await
    }

    /// Changes the page size and returns to page 1.
    pub async fn set_limit(&self, limit: i64) -> Result<Arc<Page<R::Item>>, QueryError> {
        let request = PageRequest::new(1, limit)?;
        self.query.set_request(request);
        self.open().await
    }

    pub async fn create(
        &self,
        input: R::Create,
    ) -> Result<MutationResponse<R::Item>, ClientError> {
        self.run(MutationOp::Create(input)).await
    }

    pub async fn update(
        &self,
        id: impl Into<String>,
        input: R::Update,
    ) -> Result<MutationResponse<R::Item>, ClientError> {
        self.run(MutationOp::Update { id: id.into(), input }).await
    }

    pub async fn delete(
        &self,
        id: impl Into<String>,
    ) -> Result<MutationResponse<R::Item>, ClientError> {
        self.run(MutationOp::Delete { id: id.into() }).await
    }

    /// Mutation result is returned even if the follow-up refresh fails; the
    /// refresh error stays visible on the query snapshot.
    async fn run(&self, op: MutationOp<R>) -> Result<MutationResponse<R::Item>, ClientError> {
        let response = self.mutation.execute(op).await?;
        if let Err(e) = self.sync().await {
            tracing::warn!(resource = %R::NAME, error = %e, "refresh after mutation failed");
        }
        Ok(response)
    }

    /// Refetches the displayed page if its namespace was invalidated since the
    /// last sync. Returns whether a refetch happened.
    pub async fn sync(&self) -> Result<bool, QueryError> {
        if !self.drain_invalidations() && !self.query.is_stale() {
            return Ok(false);
        }
        self.open().await?;
        Ok(true)
    }

    fn drain_invalidations(&self) -> bool {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        let mut hit = false;
        loop {
            match events.try_recv() {
                Ok(event) => hit |= event.namespace == R::NAME,
                // Missed events may have touched this namespace.
                Err(TryRecvError::Lagged(_)) => hit = true,
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        hit
    }
}
