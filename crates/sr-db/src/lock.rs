//! Change-log lock service
//!
//! Mutual exclusion between concurrent migration runs rests on a single
//! conditional `UPDATE` of the lock row: it only matches while the row is
//! unlocked, so exactly one runner sees one affected row. This service
//! never waits or retries; a runner that loses the race gets `false`.

use std::sync::Arc;

use sr_core::changelog::LOCK_ROW_ID;
use sr_core::{HostIdentity, LockRow};
use sr_sql::Statement;

use crate::error::{DbError, LockError, LockResult};
use crate::executor::Executor;
use crate::row::RowReader;

/// Lock service for one migration run
pub struct LockService {
    executor: Arc<Executor>,
    host: HostIdentity,
    has_lock_table: Option<bool>,
    lock_table_initialized: Option<bool>,
    has_lock: bool,
}

impl LockService {
    pub fn new(executor: Arc<Executor>, host: HostIdentity) -> Self {
        Self {
            executor,
            host,
            has_lock_table: None,
            lock_table_initialized: None,
            has_lock: false,
        }
    }

    fn lock_table(&self) -> String {
        self.executor.context().lock_table()
    }

    /// Whether the lock table exists. Probed once, then cached.
    pub async fn has_lock_table(&mut self) -> LockResult<bool> {
        if let Some(exists) = self.has_lock_table {
            return Ok(exists);
        }

        let table = self.lock_table();
        let probe = format!("SELECT ID FROM {table} LIMIT 1");
        let exists = match self.executor.db().query_rows(&probe).await {
            Ok(_) => true,
            Err(e @ (DbError::TableNotFound(_) | DbError::Offline(_))) => {
                log::info!("No {table} table available ({e})");
                false
            }
            Err(e) => return Err(e.into()),
        };
        self.has_lock_table = Some(exists);
        Ok(exists)
    }

    /// Whether the lock table holds its lock row. Probed once, then cached.
    ///
    /// A failing probe reads as "not initialized" when the table was just
    /// created, or when nothing is sent to a live database. Any other
    /// failure means the table exists but cannot be read, and is fatal.
    pub async fn is_lock_table_initialized(
        &mut self,
        table_just_created: bool,
    ) -> LockResult<bool> {
        if let Some(initialized) = self.lock_table_initialized {
            return Ok(initialized);
        }

        let table = self.lock_table();
        let probe = format!("SELECT COUNT(*) FROM {table}");
        let initialized = match self.executor.db().query_count(&probe).await {
            Ok(rows) => rows > 0,
            Err(e) if !self.executor.db().updates_database() => {
                log::debug!("Cannot read {table} offline ({e})");
                !table_just_created
            }
            Err(e) if table_just_created => {
                log::debug!("Freshly created {table} not readable yet ({e})");
                false
            }
            Err(source) => return Err(LockError::Unexpected { table, source }),
        };
        self.lock_table_initialized = Some(initialized);
        Ok(initialized)
    }

    /// Create the lock table and insert the lock row when missing.
    pub async fn init(&mut self) -> LockResult<()> {
        let mut just_created = false;
        if !self.has_lock_table().await? {
            self.executor
                .execute(&Statement::CreateChangeLogLockTable)
                .await?;
            log::info!("Created change log lock table {}", self.lock_table());
            self.has_lock_table = Some(true);
            just_created = true;
        }

        if !self.is_lock_table_initialized(just_created).await? {
            self.executor
                .execute(&Statement::InitializeChangeLogLockTable)
                .await?;
            log::info!("Initialized change log lock table {}", self.lock_table());
            self.lock_table_initialized = Some(true);
        }
        Ok(())
    }

    /// Try to take the lock once; `false` means another runner holds it.
    pub async fn acquire_lock(&mut self) -> LockResult<bool> {
        if self.has_lock {
            return Ok(true);
        }

        self.init().await?;

        let affected = self
            .executor
            .execute(&Statement::LockChangeLog {
                host: self.host.clone(),
            })
            .await?;

        if !self.executor.db().updates_database() {
            self.has_lock = true;
            return Ok(true);
        }

        if affected == 1 {
            log::info!(
                "Successfully acquired change log lock as {}",
                self.host.lock_holder()
            );
            self.has_lock = true;
            Ok(true)
        } else {
            if affected > 1 {
                log::warn!(
                    "Lock update on {} matched {affected} rows, expected at most one",
                    self.lock_table()
                );
            }
            log::info!("Change log lock is held by another runner");
            Ok(false)
        }
    }

    /// Release the lock and return the rows the unlock touched. Releasing
    /// a lock that is not held is not an error; it touches no rows.
    pub async fn release_lock(&mut self) -> LockResult<u64> {
        let mut affected = 0;
        if self.has_lock_table().await? || !self.executor.db().updates_database() {
            affected = self.executor.execute(&Statement::UnlockChangeLog).await?;
            if affected == 0 && self.executor.db().updates_database() {
                log::warn!("Change log lock in {} was not held", self.lock_table());
            } else {
                log::info!("Successfully released change log lock");
            }
        }
        self.has_lock = false;
        Ok(affected)
    }

    /// Rows currently holding the lock
    pub async fn list_locks(&mut self) -> LockResult<Vec<LockRow>> {
        if !self.has_lock_table().await? {
            return Ok(Vec::new());
        }

        let table = self.lock_table();
        let rows = self.executor.query(&Statement::SelectLockRows).await?;
        let mut locks = Vec::new();
        for cells in &rows {
            let row = lock_row(&RowReader::new(&table, cells))?;
            if row.locked {
                locks.push(row);
            }
        }
        Ok(locks)
    }

    /// Whether this service currently holds the lock
    pub fn has_change_log_lock(&self) -> bool {
        self.has_lock
    }

    /// Forget cached table state and the held-lock flag
    pub fn reset(&mut self) {
        self.has_lock_table = None;
        self.lock_table_initialized = None;
        self.has_lock = false;
    }
}

fn lock_row(row: &RowReader<'_>) -> Result<LockRow, DbError> {
    let id = row
        .opt_i64(0, "ID")?
        .ok_or_else(|| row.invalid("ID is NULL"))?;
    let id = i32::try_from(id).map_err(|_| row.invalid(format!("ID {id} out of range")))?;
    if id != LOCK_ROW_ID {
        log::warn!("Unexpected lock row ID {id}");
    }
    Ok(LockRow {
        id,
        locked: row.bool(1, "LOCKED")?,
        granted: row.opt_datetime(2, "LOCKGRANTED")?,
        locked_by: row.opt_string(3),
    })
}

#[cfg(test)]
#[path = "lock_test.rs"]
mod tests;
