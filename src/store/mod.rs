//! # Record Store
//!
//! Durable storage of Items keyed by id.
//!
//! The store never opens connections on its own. Every operation runs on the
//! connection borrowed by the caller's unit of work, so the caller decides
//! when writes become visible (see [`crate::session::UnitOfWork`]).
//!
//! # Operations
//!
//! - `insert` - assign a new id and persist the row
//! - `get_by_id` - point lookup
//! - `update_name` - overwrite the name of an existing row
//! - `delete_by_id` - remove an existing row

mod errors;
mod item;
mod repository;
pub mod schema;

pub use errors::{StoreError, StoreResult};
pub use item::{Item, ItemId};
pub use repository::ItemStore;
