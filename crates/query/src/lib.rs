//! List-resource synchronization for leadsync.
//!
//! A shared [`QueryClient`] caches pages by `(resource, page, limit)`,
//! coalesces identical fetches and invalidates per resource. [`ListQuery`],
//! [`Mutation`] and [`ListView`] are instantiated once per resource type.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short closure params are idiomatic")]

mod cache;
mod error;
mod list_query;
mod mutation;
mod reconcile;
mod view;

#[cfg(test)]
mod test_support;

pub use cache::{CacheStats, FetchSource, Invalidation, QueryClient};
pub use error::QueryError;
pub use list_query::{ListQuery, QueryResult, QueryStatus};
pub use mutation::{Mutation, MutationOp, MutationState};
pub use reconcile::{Reconciler, clamp_target};
pub use view::{ListView, PageControls};
