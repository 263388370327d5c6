//! In-memory HTTP backend serving the leadsync resource contract.
//!
//! Every resource is exposed under its namespace:
//! `GET /{resource}/fetch`, `POST /{resource}/create`,
//! `PATCH /{resource}/edit` (or `/update`) and `DELETE /{resource}/delete/{id}`.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short closure params are idiomatic")]
#![allow(clippy::exhaustive_structs, reason = "HTTP types are stable")]

pub mod api_error;
mod error;
mod handlers;
mod query_types;
pub mod store;

use std::sync::Arc;

use axum::routing::{delete, get, patch, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub use error::StoreError;
pub use store::ResourceStore;

/// Shared application state for all HTTP handlers.
#[derive(Debug, Default)]
pub struct AppState {
    pub store: ResourceStore,
}

impl AppState {
    #[must_use]
    pub fn new(store: ResourceStore) -> Self {
        Self { store }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/{resource}/fetch", get(handlers::resources::fetch))
        .route("/{resource}/create", post(handlers::resources::create))
        .route("/{resource}/edit", patch(handlers::resources::edit))
        .route("/{resource}/update", patch(handlers::resources::edit))
        .route("/{resource}/delete/{id}", delete(handlers::resources::delete))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves `state` on an already-bound listener until the task is dropped.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "leadsync backend listening");
    axum::serve(listener, create_router(state)).await
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod router_tests;
