//! HTTP client for leadsync resource endpoints.
//!
//! One [`ApiClient`] holds the connection; [`ResourceClient`] turns the four
//! logical operations of a resource into exactly one HTTP call each.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]

mod client;
mod error;

#[cfg(test)]
mod client_tests;

pub use client::{ApiClient, Operation, ResourceApi, ResourceClient, truncate};
pub use error::ClientError;
