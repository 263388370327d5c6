//! Concrete backend collections.
//!
//! Each marker type implements [`Resource`](crate::Resource) and names the
//! record and payload types of one dashboard collection.

mod billing;
mod campaigns;
mod contacts;
mod taxonomy;
mod workspaces;

pub use billing::*;
pub use campaigns::*;
pub use contacts::*;
pub use taxonomy::*;
pub use workspaces::*;
