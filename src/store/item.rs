//! Persisted Item record

use sqlx::FromRow;

/// Primary key type of the `items` table
pub type ItemId = i64;

/// A fully materialized row of the `items` table.
///
/// Returned by value from every store operation; it holds no reference to
/// the connection or transaction it was read through.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
}
