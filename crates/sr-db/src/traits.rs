//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;
use sr_core::DatabaseConnection;

/// Result rows with every cell rendered as text; `None` is SQL NULL.
pub type Rows = Vec<Vec<Option<String>>>;

/// Database abstraction trait for starrocks-migrate
///
/// Implementations must be Send + Sync for async operation. Statements run
/// one at a time on a single connection, outside any transaction.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute SQL that modifies data, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<u64>;

    /// Run a single-value integer query such as `SELECT COUNT(*) ...`
    async fn query_count(&self, sql: &str) -> DbResult<i64>;

    /// Run a query and return all rows
    async fn query_rows(&self, sql: &str) -> DbResult<Rows>;

    /// Whether executed SQL reaches a live database
    fn updates_database(&self) -> bool {
        true
    }

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;

    /// Metadata used for dialect detection
    fn connection(&self) -> &dyn DatabaseConnection;
}
