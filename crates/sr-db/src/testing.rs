//! Scripted database for unit tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use sr_core::DatabaseConnection;

use crate::connection::ConnectionInfo;
use crate::error::DbResult;
use crate::traits::{Database, Rows};

/// Database answering from scripted queues.
///
/// Each call pops the next scripted answer; once a queue is empty,
/// `execute` affects one row, `query_rows` returns no rows and
/// `query_count` returns zero.
pub(crate) struct MockDatabase {
    info: ConnectionInfo,
    updates: bool,
    executed: Mutex<Vec<String>>,
    queried: Mutex<Vec<String>>,
    execute_results: Mutex<VecDeque<DbResult<u64>>>,
    row_results: Mutex<VecDeque<DbResult<Rows>>>,
    count_results: Mutex<VecDeque<DbResult<i64>>>,
}

impl MockDatabase {
    pub(crate) fn new(url: &str) -> Self {
        Self {
            info: ConnectionInfo::from_url(url),
            updates: true,
            executed: Mutex::new(Vec::new()),
            queried: Mutex::new(Vec::new()),
            execute_results: Mutex::new(VecDeque::new()),
            row_results: Mutex::new(VecDeque::new()),
            count_results: Mutex::new(VecDeque::new()),
        }
    }

    pub(crate) fn starrocks() -> Self {
        Self::new("starrocks://root@fe:9030/analytics")
    }

    pub(crate) fn offline(mut self) -> Self {
        self.updates = false;
        self
    }

    pub(crate) fn with_connection(mut self, info: ConnectionInfo) -> Self {
        self.info = info;
        self
    }

    pub(crate) fn on_execute(self, result: DbResult<u64>) -> Self {
        self.execute_results.lock().unwrap().push_back(result);
        self
    }

    pub(crate) fn on_rows(self, result: DbResult<Rows>) -> Self {
        self.row_results.lock().unwrap().push_back(result);
        self
    }

    pub(crate) fn on_count(self, result: DbResult<i64>) -> Self {
        self.count_results.lock().unwrap().push_back(result);
        self
    }

    /// SQL passed to `execute`
    pub(crate) fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    /// SQL passed to `query_rows` and `query_count`
    pub(crate) fn queried(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }
}

pub(crate) fn text_row(values: &[Option<&str>]) -> Vec<Option<String>> {
    values.iter().map(|v| v.map(str::to_string)).collect()
}

#[async_trait]
impl Database for MockDatabase {
    async fn execute(&self, sql: &str) -> DbResult<u64> {
        self.executed.lock().unwrap().push(sql.to_string());
        self.execute_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(1))
    }

    async fn query_count(&self, sql: &str) -> DbResult<i64> {
        self.queried.lock().unwrap().push(sql.to_string());
        self.count_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(0))
    }

    async fn query_rows(&self, sql: &str) -> DbResult<Rows> {
        self.queried.lock().unwrap().push(sql.to_string());
        self.row_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn updates_database(&self) -> bool {
        self.updates
    }

    fn db_type(&self) -> &'static str {
        "mock"
    }

    fn connection(&self) -> &dyn DatabaseConnection {
        &self.info
    }
}
