//! # Schema Bootstrap
//!
//! Creates the `items` table and its name index. Safe to run on every boot.

use sqlx::SqliteConnection;

use super::errors::StoreResult;

/// DDL executed in order by [`bootstrap`]
const STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS ix_items_name ON items (name)",
];

/// Create the table and index if they do not exist yet
pub async fn bootstrap(conn: &mut SqliteConnection) -> StoreResult<()> {
    for statement in STATEMENTS {
        sqlx::query(statement).execute(&mut *conn).await?;
    }
    Ok(())
}
