//! # Wire Types
//!
//! External request/response shapes, kept apart from the persisted
//! [`Item`] record.

use serde::{Deserialize, Serialize};

use crate::store::{Item, ItemId};

/// Body of create and update requests.
///
/// `name` must be present and a JSON string. Unknown fields, including a
/// caller-supplied `id`, are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCreate {
    pub name: String,
}

/// Read-only projection of an [`Item`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRead {
    pub id: ItemId,
    pub name: String,
}

impl From<Item> for ItemRead {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
        }
    }
}

/// Body of a successful delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    pub detail: String,
}

impl DeleteConfirmation {
    pub fn item_deleted() -> Self {
        Self {
            detail: "Item deleted".to_string(),
        }
    }
}
