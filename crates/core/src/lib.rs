//! Core types for leadsync
//!
//! Resources, pagination windows, response envelopes and query keys shared by
//! the client, query and server crates.

pub mod constants;
mod env_config;
mod envelope;
mod error;
mod pagination;
mod query_key;
mod resource;
pub mod resources;

pub use constants::*;
pub use env_config::*;
pub use envelope::*;
pub use error::*;
pub use pagination::*;
pub use query_key::*;
pub use resource::*;
