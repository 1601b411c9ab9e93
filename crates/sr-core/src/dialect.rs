//! Database dialect descriptors and detection
//!
//! A dialect describes one database product: how to recognise it from a
//! live connection, its default port and wire driver, and which generic
//! capabilities it lacks. Detection tries the registered dialects in
//! descending priority and picks the first one whose predicate matches, so
//! the StarRocks descriptor wins over the generic MySQL one even though a
//! StarRocks front-end reports itself as MySQL on the wire.

use std::cmp::Reverse;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::sql_utils::{qualify_table, string_literal};

/// Priority of the generic, dialect-agnostic implementations.
pub const PRIORITY_DEFAULT: i32 = 1;

/// Priority of database-specific implementations; must beat [`PRIORITY_DEFAULT`].
pub const PRIORITY_DATABASE: i32 = 5;

/// Product name StarRocks reports and the one matched during detection.
pub const STARROCKS_PRODUCT_NAME: &str = "StarRocks";

/// Default StarRocks FE query port.
pub const STARROCKS_DEFAULT_PORT: u16 = 9030;

/// Wire driver used for every MySQL-protocol connection.
pub const MYSQL_DRIVER: &str = "mysql";

/// Metadata exposed by a live connection, used for dialect detection.
pub trait DatabaseConnection {
    /// Product name reported by the driver
    fn product_name(&self) -> Option<String>;

    /// Connection URL the connection was opened with
    fn url(&self) -> Option<String>;

    /// Product version string; reading it may fail
    fn product_version(&self) -> CoreResult<Option<String>>;
}

/// Identifies a dialect in generator and type-mapping registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectTag {
    /// StarRocks (MySQL wire protocol, OLAP storage)
    StarRocks,
    /// Generic MySQL
    MySql,
}

impl DialectTag {
    /// Short name used in configuration and logs
    pub fn short_name(self) -> &'static str {
        match self {
            DialectTag::StarRocks => "starrocks",
            DialectTag::MySql => "mysql",
        }
    }

    /// The built-in descriptor for this tag
    pub fn dialect(self) -> &'static dyn Dialect {
        match self {
            DialectTag::StarRocks => &StarRocksDialect,
            DialectTag::MySql => &MySqlDialect,
        }
    }
}

impl fmt::Display for DialectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Capability descriptor for one database product.
pub trait Dialect: Send + Sync {
    /// Registry tag of this dialect
    fn tag(&self) -> DialectTag;

    /// Product name matched against the connection
    fn product_name(&self) -> &'static str;

    /// Short name used in configuration and logs
    fn short_name(&self) -> &'static str {
        self.tag().short_name()
    }

    /// Detection priority; higher is tried first
    fn priority(&self) -> i32;

    /// Default network port
    fn default_port(&self) -> u16;

    /// Wire driver for `url`, if the URL scheme is recognised
    fn default_driver(&self, url: Option<&str>) -> Option<&'static str>;

    /// Whether `conn` targets this dialect
    fn is_correct_implementation(&self, conn: &dyn DatabaseConnection) -> bool;

    /// SQL expression for the current timestamp
    fn current_datetime_function(&self) -> &'static str {
        "NOW()"
    }

    fn supports_initially_deferrable_columns(&self) -> bool;

    fn supports_tablespaces(&self) -> bool;

    fn supports_sequences(&self) -> bool;

    fn supports_schemas(&self) -> bool;

    fn supports_ddl_in_transaction(&self) -> bool;

    /// Render `value` as a string literal safe for this dialect
    fn escape_string_literal(&self, value: &str) -> String {
        string_literal(value)
    }

    /// Render a schema-qualified table reference
    fn escape_table_name(&self, schema: &str, table: &str) -> String {
        qualify_table(schema, table)
    }
}

impl fmt::Debug for dyn Dialect + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialect")
            .field("tag", &self.tag())
            .field("priority", &self.priority())
            .finish()
    }
}

/// StarRocks dialect
#[derive(Debug, Clone, Copy, Default)]
pub struct StarRocksDialect;

impl Dialect for StarRocksDialect {
    fn tag(&self) -> DialectTag {
        DialectTag::StarRocks
    }

    fn product_name(&self) -> &'static str {
        STARROCKS_PRODUCT_NAME
    }

    fn priority(&self) -> i32 {
        PRIORITY_DATABASE
    }

    fn default_port(&self) -> u16 {
        STARROCKS_DEFAULT_PORT
    }

    fn default_driver(&self, url: Option<&str>) -> Option<&'static str> {
        match url {
            Some(url) if url.starts_with("starrocks://") || url.starts_with("mysql://") => {
                Some(MYSQL_DRIVER)
            }
            _ => None,
        }
    }

    fn is_correct_implementation(&self, conn: &dyn DatabaseConnection) -> bool {
        if conn
            .product_name()
            .is_some_and(|name| name.eq_ignore_ascii_case(STARROCKS_PRODUCT_NAME))
        {
            return true;
        }

        if conn.url().is_some_and(|url| url.contains("starrocks")) {
            return true;
        }

        match conn.product_version() {
            Ok(Some(version)) => version
                .to_lowercase()
                .contains(&STARROCKS_PRODUCT_NAME.to_lowercase()),
            Ok(None) => false,
            Err(e) => {
                log::debug!("Ignoring version lookup failure during StarRocks detection: {e}");
                false
            }
        }
    }

    fn supports_initially_deferrable_columns(&self) -> bool {
        false
    }

    fn supports_tablespaces(&self) -> bool {
        false
    }

    fn supports_sequences(&self) -> bool {
        false
    }

    fn supports_schemas(&self) -> bool {
        false
    }

    fn supports_ddl_in_transaction(&self) -> bool {
        false
    }
}

/// Generic MySQL dialect, the target of the standard generators
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn tag(&self) -> DialectTag {
        DialectTag::MySql
    }

    fn product_name(&self) -> &'static str {
        "MySQL"
    }

    fn priority(&self) -> i32 {
        PRIORITY_DEFAULT
    }

    fn default_port(&self) -> u16 {
        3306
    }

    fn default_driver(&self, url: Option<&str>) -> Option<&'static str> {
        url.filter(|u| u.starts_with("mysql://"))
            .map(|_| MYSQL_DRIVER)
    }

    fn is_correct_implementation(&self, conn: &dyn DatabaseConnection) -> bool {
        conn.product_name()
            .is_some_and(|name| name.eq_ignore_ascii_case(self.product_name()))
    }

    fn supports_initially_deferrable_columns(&self) -> bool {
        false
    }

    fn supports_tablespaces(&self) -> bool {
        false
    }

    fn supports_sequences(&self) -> bool {
        false
    }

    fn supports_schemas(&self) -> bool {
        false
    }

    fn supports_ddl_in_transaction(&self) -> bool {
        false
    }
}

/// All dialects known to this crate.
pub fn builtin_dialects() -> [&'static dyn Dialect; 2] {
    [&StarRocksDialect, &MySqlDialect]
}

/// Pick the dialect for `conn`.
///
/// Candidates are tried in descending priority; ties keep their given
/// order. Returns `None` when no candidate recognises the connection.
pub fn detect_dialect<'a>(
    conn: &dyn DatabaseConnection,
    candidates: &[&'a dyn Dialect],
) -> Option<&'a dyn Dialect> {
    let mut ordered: Vec<&'a dyn Dialect> = candidates.to_vec();
    ordered.sort_by_key(|d| Reverse(d.priority()));
    let found = ordered
        .into_iter()
        .find(|d| d.is_correct_implementation(conn));
    match found {
        Some(dialect) => log::debug!("Detected {} dialect", dialect.short_name()),
        None => log::debug!("No dialect recognised the connection"),
    }
    found
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
