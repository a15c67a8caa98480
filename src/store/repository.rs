//! # Item Store
//!
//! Single-row operations on the `items` table.

use sqlx::SqliteConnection;

use super::errors::{StoreError, StoreResult};
use super::item::{Item, ItemId};

/// Item operations bound to one borrowed connection.
///
/// Obtained from [`crate::session::UnitOfWork::items`]; every statement runs
/// inside that unit of work's transaction.
pub struct ItemStore<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> ItemStore<'c> {
    /// Bind the store to a connection
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Insert a new row and return it with its assigned id
    pub async fn insert(&mut self, name: &str) -> StoreResult<Item> {
        let item = sqlx::query_as::<_, Item>(
            "INSERT INTO items (name) VALUES (?1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(item)
    }

    /// Look up a row by primary key
    pub async fn get_by_id(&mut self, id: ItemId) -> StoreResult<Item> {
        sqlx::query_as::<_, Item>("SELECT id, name FROM items WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or(StoreError::NotFound { id })
    }

    /// Overwrite the name of an existing row.
    ///
    /// No version check: concurrent updates are last-writer-wins.
    pub async fn update_name(&mut self, id: ItemId, name: &str) -> StoreResult<Item> {
        sqlx::query_as::<_, Item>("UPDATE items SET name = ?1 WHERE id = ?2 RETURNING id, name")
            .bind(name)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or(StoreError::NotFound { id })
    }

    /// Remove a row by primary key
    pub async fn delete_by_id(&mut self, id: ItemId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { id });
        }
        Ok(())
    }
}
