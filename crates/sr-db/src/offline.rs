//! Offline database backend
//!
//! Records every statement instead of running it, for producing a SQL
//! script to apply by hand. Reads are impossible, so every query fails
//! with [`DbError::Offline`].

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use sr_core::DatabaseConnection;

use crate::connection::ConnectionInfo;
use crate::error::{DbError, DbResult};
use crate::traits::{Database, Rows};

/// SQL-recording database
pub struct OfflineDatabase {
    statements: Mutex<Vec<String>>,
    info: ConnectionInfo,
}

impl OfflineDatabase {
    /// Offline database for the server `url` would connect to
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            statements: Mutex::new(Vec::new()),
            info: ConnectionInfo::from_url(url),
        }
    }

    /// Statements recorded so far, in execution order
    pub fn statements(&self) -> Vec<String> {
        self.statements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recorded statements as a `;`-terminated script
    pub fn to_script(&self) -> String {
        self.statements()
            .iter()
            .map(|sql| format!("{sql};\n"))
            .collect()
    }
}

#[async_trait]
impl Database for OfflineDatabase {
    async fn execute(&self, sql: &str) -> DbResult<u64> {
        self.statements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sql.to_string());
        Ok(0)
    }

    async fn query_count(&self, sql: &str) -> DbResult<i64> {
        Err(DbError::Offline(sql.to_string()))
    }

    async fn query_rows(&self, sql: &str) -> DbResult<Rows> {
        Err(DbError::Offline(sql.to_string()))
    }

    fn updates_database(&self) -> bool {
        false
    }

    fn db_type(&self) -> &'static str {
        "offline"
    }

    fn connection(&self) -> &dyn DatabaseConnection {
        &self.info
    }
}
