//! # Unit of Work
//!
//! One borrowed connection plus one open transaction, scoped to a request.

use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

use crate::observability::Logger;
use crate::store::{ItemStore, StoreResult};

/// A request-scoped transaction.
///
/// Writes become visible to other units of work only after [`commit`].
/// Dropping the guard without committing rolls the transaction back and
/// returns the connection to the pool; this also covers a request future
/// that is cancelled mid-flight.
///
/// [`commit`]: UnitOfWork::commit
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
    release: ReleaseLog,
}

impl UnitOfWork {
    pub(super) fn new(tx: Transaction<'static, Sqlite>) -> Self {
        let id = Uuid::new_v4();
        Logger::trace("UNIT_OF_WORK_BEGIN", &[("unit_of_work", &id.to_string())]);
        Self {
            tx,
            release: ReleaseLog {
                id,
                committed: false,
            },
        }
    }

    /// Correlation id for log lines
    pub fn id(&self) -> Uuid {
        self.release.id
    }

    /// Item operations running inside this transaction
    pub fn items(&mut self) -> ItemStore<'_> {
        ItemStore::new(&mut self.tx)
    }

    /// Commit all writes and release the connection
    pub async fn commit(self) -> StoreResult<()> {
        let UnitOfWork { tx, mut release } = self;
        tx.commit().await?;
        release.committed = true;
        Ok(())
    }

    /// Discard all writes and release the connection
    pub async fn rollback(self) -> StoreResult<()> {
        let UnitOfWork { tx, release: _release } = self;
        tx.rollback().await?;
        Ok(())
    }
}

/// Logs how the unit of work ended once its transaction is gone
struct ReleaseLog {
    id: Uuid,
    committed: bool,
}

impl Drop for ReleaseLog {
    fn drop(&mut self) {
        let event = if self.committed {
            "UNIT_OF_WORK_COMMIT"
        } else {
            "UNIT_OF_WORK_ROLLBACK"
        };
        Logger::trace(event, &[("unit_of_work", &self.id.to_string())]);
    }
}
