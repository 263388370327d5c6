//! In-memory label backend for unit tests.

use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use leadsync_client::{ClientError, ResourceApi};
use leadsync_core::resources::{Label, LabelInput, Labels};
use leadsync_core::{MutationResponse, Page, PageRequest, Pagination};

/// Serves labels newest-first, counting network calls.
pub struct FakeLabels {
    items: Mutex<Vec<Label>>,
    next_id: AtomicUsize,
    fetch_calls: AtomicUsize,
    fail_next: AtomicU16,
    delay: Mutex<Duration>,
}

impl FakeLabels {
    pub fn with_titles(count: usize) -> Self {
        let items = (1..=count)
            .rev()
            .map(|n| Label {
                id: format!("l{n}"),
                title: format!("Label {n}"),
                color: None,
                created_at: None,
                updated_at: None,
            })
            .collect();
        Self {
            items: Mutex::new(items),
            next_id: AtomicUsize::new(count.saturating_add(1)),
            fetch_calls: AtomicUsize::new(0),
            fail_next: AtomicU16::new(0),
            delay: Mutex::new(Duration::ZERO),
        }
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Next fetch answers with this HTTP status.
    pub fn fail_next_fetch(&self, status: u16) {
        self.fail_next.store(status, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap_or_else(PoisonError::into_inner) = delay;
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn delay(&self) -> Duration {
        *self.delay.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ResourceApi<Labels> for FakeLabels {
    async fn fetch_page(&self, request: PageRequest) -> Result<Page<Label>, ClientError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let status = self.fail_next.swap(0, Ordering::SeqCst);
        if status != 0 {
            return Err(ClientError::Api { status, message: "injected failure".to_owned() });
        }
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        let page_items: Vec<Label> =
            items.iter().skip(request.offset()).take(request.limit() as usize).cloned().collect();
        Ok(Page { items: page_items, pagination: Pagination::compute(items.len() as u64, request) })
    }

    async fn create(&self, input: &LabelInput) -> Result<MutationResponse<Label>, ClientError> {
        if input.title.trim().is_empty() {
            return Err(ClientError::Api { status: 422, message: "title is required".to_owned() });
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let label = Label {
            id: format!("l{n}"),
            title: input.title.clone(),
            color: input.color.clone(),
            created_at: None,
            updated_at: None,
        };
        self.items.lock().unwrap_or_else(PoisonError::into_inner).insert(0, label.clone());
        Ok(MutationResponse::ok("Label created", Some(label)))
    }

    async fn update(
        &self,
        id: &str,
        input: &LabelInput,
    ) -> Result<MutationResponse<Label>, ClientError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(label) = items.iter_mut().find(|l| l.id == id) else {
            return Err(ClientError::Api { status: 404, message: format!("label {id} not found") });
        };
        label.title = input.title.clone();
        label.color = input.color.clone();
        Ok(MutationResponse::ok("Label updated", Some(label.clone())))
    }

    async fn delete(&self, id: &str) -> Result<MutationResponse<Label>, ClientError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(pos) = items.iter().position(|l| l.id == id) else {
            return Err(ClientError::Api { status: 404, message: format!("label {id} not found") });
        };
        let removed = items.remove(pos);
        Ok(MutationResponse::ok("Label deleted", Some(removed)))
    }
}
