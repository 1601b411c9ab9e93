//! MySQL-wire database backend
//!
//! StarRocks front-ends speak the MySQL protocol, so a single
//! `mysql_async` connection serves both StarRocks and plain MySQL. The
//! connection is held for the whole run behind an async mutex.

use async_trait::async_trait;
use mysql_async::prelude::*;
use mysql_async::{Conn, Opts, Row, Value};
use sr_core::config::redact_url;
use sr_core::{DatabaseConnection, Dialect, StarRocksDialect};
use tokio::sync::Mutex;

use crate::connection::ConnectionInfo;
use crate::error::{DbError, DbResult};
use crate::traits::{Database, Rows};

/// Product name the MySQL wire protocol reports
const WIRE_PRODUCT_NAME: &str = "MySQL";

/// MySQL server error codes meaning "no such table"
const TABLE_NOT_FOUND_CODES: [u16; 4] = [
    1146, // ER_NO_SUCH_TABLE
    1051, // ER_BAD_TABLE_ERROR
    1049, // ER_BAD_DB_ERROR
    5502, // StarRocks: unknown table
];

/// MySQL-wire database backend
pub struct MySqlBackend {
    conn: Mutex<Conn>,
    info: ConnectionInfo,
}

impl MySqlBackend {
    /// Connect to a `starrocks://` or `mysql://` URL
    pub async fn connect(url: &str) -> DbResult<Self> {
        let opts = Opts::from_url(&wire_url(url)?)
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        let mut conn = Conn::new(opts)
            .await
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;

        let version = probe_version(&mut conn).await;
        log::info!(
            "Connected to {} ({})",
            redact_url(url),
            version
                .as_ref()
                .ok()
                .and_then(|v| v.as_deref())
                .unwrap_or("unknown version")
        );

        Ok(Self {
            conn: Mutex::new(conn),
            info: ConnectionInfo::new(
                Some(WIRE_PRODUCT_NAME.to_string()),
                Some(url.to_string()),
                version,
            ),
        })
    }

    /// Close the connection
    pub async fn disconnect(self) -> DbResult<()> {
        self.conn
            .into_inner()
            .disconnect()
            .await
            .map_err(|e| DbError::ConnectionError(e.to_string()))
    }
}

/// Rewrite the URL into the `mysql://` form the driver accepts.
fn wire_url(url: &str) -> DbResult<String> {
    if StarRocksDialect.default_driver(Some(url)).is_none() {
        return Err(DbError::ConnectionError(format!(
            "unsupported URL scheme in '{}', expected starrocks:// or mysql://",
            redact_url(url)
        )));
    }
    Ok(match url.strip_prefix("starrocks://") {
        Some(rest) => format!("mysql://{rest}"),
        None => url.to_string(),
    })
}

/// `VERSION()` plus `@@version_comment`; StarRocks identifies itself in
/// the comment while reporting a MySQL-compatible version number.
async fn probe_version(conn: &mut Conn) -> Result<Option<String>, String> {
    let version: Option<String> = conn
        .query_first("SELECT VERSION()")
        .await
        .map_err(|e| e.to_string())?;
    let comment: Option<String> = match conn.query_first("SELECT @@version_comment").await {
        Ok(comment) => comment,
        Err(e) => {
            log::debug!("@@version_comment unavailable: {e}");
            None
        }
    };

    let parts: Vec<String> = version.into_iter().chain(comment).collect();
    Ok(if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    })
}

/// Whether a server error means the table (or its database) is absent
pub(crate) fn is_table_not_found(code: u16, state: &str, message: &str) -> bool {
    TABLE_NOT_FOUND_CODES.contains(&code) || state == "42S02" || names_missing_table(message)
}

/// Matches "Unknown table ..." and "Table X does not exist" / "is not
/// found" style messages, but not the same phrasing about a column.
fn names_missing_table(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    if message.contains("unknown table") || message.contains("unknown database") {
        return true;
    }
    ["does not exist", "not found"].iter().any(|marker| {
        message.find(marker).is_some_and(|pos| {
            // Subject of the clause the marker ends, e.g. "Detail message: Table T is not found"
            let clause = message[..pos].rsplit(": ").next().unwrap_or_default();
            let subject = clause.rsplit(". ").next().unwrap_or_default().trim_start();
            subject.starts_with("table ") || subject.starts_with("database ")
        })
    })
}

/// Classify a driver error, keeping the failed SQL for context
fn classify(err: mysql_async::Error, sql: &str) -> DbError {
    match err {
        mysql_async::Error::Server(ref server)
            if is_table_not_found(server.code, &server.state, &server.message) =>
        {
            DbError::TableNotFound(format!("{}: {}", server.message, sql))
        }
        mysql_async::Error::Io(e) => DbError::ConnectionError(e.to_string()),
        mysql_async::Error::Url(e) => DbError::ConnectionError(e.to_string()),
        e => DbError::ExecutionError(format!("{}: {}", e, sql)),
    }
}

fn cell_to_string(value: &Value) -> Option<String> {
    match value {
        Value::NULL => None,
        Value::Bytes(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        Value::Int(i) => Some(i.to_string()),
        Value::UInt(u) => Some(u.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Double(d) => Some(d.to_string()),
        Value::Date(y, mo, d, h, mi, s, us) => Some(if *us == 0 {
            format!("{y:04}-{mo:02}-{d:02} {h:02}:{mi:02}:{s:02}")
        } else {
            format!("{y:04}-{mo:02}-{d:02} {h:02}:{mi:02}:{s:02}.{us:06}")
        }),
        Value::Time(neg, days, h, mi, s, _) => {
            let sign = if *neg { "-" } else { "" };
            let hours = u32::from(*h) + days * 24;
            Some(format!("{sign}{hours:02}:{mi:02}:{s:02}"))
        }
    }
}

fn row_to_strings(row: &Row) -> Vec<Option<String>> {
    (0..row.len())
        .map(|i| row.as_ref(i).and_then(cell_to_string))
        .collect()
}

#[async_trait]
impl Database for MySqlBackend {
    async fn execute(&self, sql: &str) -> DbResult<u64> {
        let mut conn = self.conn.lock().await;
        conn.query_drop(sql).await.map_err(|e| classify(e, sql))?;
        Ok(conn.affected_rows())
    }

    async fn query_count(&self, sql: &str) -> DbResult<i64> {
        let mut conn = self.conn.lock().await;
        let count: Option<i64> = conn.query_first(sql).await.map_err(|e| classify(e, sql))?;
        Ok(count.unwrap_or(0))
    }

    async fn query_rows(&self, sql: &str) -> DbResult<Rows> {
        let mut conn = self.conn.lock().await;
        let rows: Vec<Row> = conn.query(sql).await.map_err(|e| classify(e, sql))?;
        Ok(rows.iter().map(row_to_strings).collect())
    }

    fn db_type(&self) -> &'static str {
        "mysql"
    }

    fn connection(&self) -> &dyn DatabaseConnection {
        &self.info
    }
}

#[cfg(test)]
#[path = "mysql_test.rs"]
mod tests;
