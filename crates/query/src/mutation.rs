//! Single create / update / delete calls with cache reconciliation on success.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use leadsync_client::{ClientError, ResourceApi};
use leadsync_core::{MutationResponse, Resource};

use crate::reconcile::Reconciler;

/// One mutation against resource `R`.
pub enum MutationOp<R: Resource> {
    Create(R::Create),
    Update { id: String, input: R::Update },
    Delete { id: String },
}

impl<R: Resource> std::fmt::Debug for MutationOp<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create(input) => f.debug_tuple("Create").field(input).finish(),
            Self::Update { id, input } => {
                f.debug_struct("Update").field("id", id).field("input", input).finish()
            },
            Self::Delete { id } => f.debug_struct("Delete").field("id", id).finish(),
        }
    }
}

impl<R: Resource> MutationOp<R> {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }
}

/// Lifecycle of the most recent invocation: `Idle → Pending → {Success | Error}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MutationState {
    Idle = 0,
    Pending = 1,
    Success = 2,
    Error = 3,
}

impl MutationState {
    const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Pending,
            2 => Self::Success,
            3 => Self::Error,
            _ => Self::Idle,
        }
    }
}

/// Mutation handle for resource `R`. Payload validation belongs to the caller.
pub struct Mutation<R: Resource> {
    api: Arc<dyn ResourceApi<R>>,
    reconciler: Reconciler,
    state: AtomicU8,
}

impl<R: Resource> std::fmt::Debug for Mutation<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mutation")
            .field("resource", &R::NAME)
            .field("state", &self.state())
            .finish()
    }
}

impl<R: Resource> Mutation<R> {
    #[must_use]
    pub fn new(api: Arc<dyn ResourceApi<R>>, reconciler: Reconciler) -> Self {
        Self { api, reconciler, state: AtomicU8::new(MutationState::Idle as u8) }
    }

    #[must_use]
    pub fn state(&self) -> MutationState {
        MutationState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn set_state(&self, state: MutationState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }

    /// Runs `op`. On success the resource's cached pages are invalidated before returning.
    pub async fn execute(
        &self,
        op: MutationOp<R>,
    ) -> Result<MutationResponse<R::Item>, ClientError> {
        let kind = op.kind();
        self.set_state(MutationState::Pending);
        let result = match op {
            MutationOp::Create(input) => self.api.create(&input).await,
            MutationOp::Update { id, input } => self.api.update(&id, &input).await,
            MutationOp::Delete { id } => self.api.delete(&id).await,
        };
        match &result {
            Ok(_) => {
                self.reconciler.on_mutation_success(R::NAME);
                self.set_state(MutationState::Success);
                tracing::info!(resource = %R::NAME, op = kind, "mutation succeeded");
            },
            Err(e) => {
                self.set_state(MutationState::Error);
                tracing::warn!(resource = %R::NAME, op = kind, error = %e, "mutation failed");
            },
        }
        result
    }

    /// Runs `op` and calls exactly one of `on_success` / `on_error`.
    pub async fn mutate<S, E>(&self, op: MutationOp<R>, on_success: S, on_error: E)
    where
        S: FnOnce(&MutationResponse<R::Item>),
        E: FnOnce(&ClientError),
    {
        match self.execute(op).await {
            Ok(response) => on_success(&response),
            Err(e) => on_error(&e),
        }
    }
}
