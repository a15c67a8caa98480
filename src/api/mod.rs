//! # Item API
//!
//! Maps HTTP requests onto single-row record store operations.
//!
//! | Method | Path          | Success                          |
//! |--------|---------------|----------------------------------|
//! | POST   | `/items/`     | 200 `{id, name}`                 |
//! | GET    | `/items/{id}` | 200 `{id, name}`                 |
//! | PUT    | `/items/{id}` | 200 `{id, name}`                 |
//! | DELETE | `/items/{id}` | 200 `{"detail": "Item deleted"}` |
//!
//! Failures: 422 for invalid input, 404 `{"detail": "Item not found"}`,
//! 500 for storage failures.

pub mod dto;
pub mod errors;
pub mod extract;
pub mod handlers;

pub use dto::{DeleteConfirmation, ItemCreate, ItemRead};
pub use errors::{ApiError, ApiResult, ErrorBody};
pub use handlers::{item_routes, ItemsState};
