//! Explicit change-log location passed to every generator.

use indexmap::IndexMap;

use crate::error::CoreResult;
use crate::identifier::{SchemaName, TableName};

/// Default change-log table name.
pub const DEFAULT_CHANGELOG_TABLE: &str = "DATABASECHANGELOG";

/// Default change-log lock table name.
pub const DEFAULT_LOCK_TABLE: &str = "DATABASECHANGELOGLOCK";

/// Where the change-log tables live and how they are created.
///
/// Carries what would otherwise be read from the connection (current
/// schema) or from global settings (table names, table properties).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeLogContext {
    pub schema: SchemaName,
    pub changelog_table: TableName,
    pub lock_table: TableName,
    /// `PROPERTIES` rendered on the CREATE TABLE statements, in order
    pub table_properties: IndexMap<String, String>,
}

impl ChangeLogContext {
    /// Context with the default table names and `replication_num = 1`.
    pub fn new(schema: impl Into<String>) -> CoreResult<Self> {
        Ok(Self {
            schema: SchemaName::new(schema)?,
            changelog_table: TableName::new(DEFAULT_CHANGELOG_TABLE)?,
            lock_table: TableName::new(DEFAULT_LOCK_TABLE)?,
            table_properties: default_table_properties(),
        })
    }

    pub fn with_changelog_table(mut self, table: TableName) -> Self {
        self.changelog_table = table;
        self
    }

    pub fn with_lock_table(mut self, table: TableName) -> Self {
        self.lock_table = table;
        self
    }

    pub fn with_table_properties(mut self, properties: IndexMap<String, String>) -> Self {
        self.table_properties = properties;
        self
    }
}

/// `replication_num = 1`, suitable for a single-BE cluster.
pub fn default_table_properties() -> IndexMap<String, String> {
    IndexMap::from([("replication_num".to_string(), "1".to_string())])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let ctx = ChangeLogContext::new("analytics").unwrap();
        assert_eq!(ctx.schema, "analytics");
        assert_eq!(ctx.changelog_table, "DATABASECHANGELOG");
        assert_eq!(ctx.lock_table, "DATABASECHANGELOGLOCK");
        assert_eq!(
            ctx.table_properties.get("replication_num").map(String::as_str),
            Some("1")
        );
    }

    #[test]
    fn test_overrides() {
        let ctx = ChangeLogContext::new("ops")
            .unwrap()
            .with_lock_table(TableName::new("MIGRATION_LOCK").unwrap());
        assert_eq!(ctx.lock_table, "MIGRATION_LOCK");
        assert_eq!(ctx.changelog_table, "DATABASECHANGELOG");
    }

    #[test]
    fn test_invalid_schema() {
        assert!(ChangeLogContext::new("").is_err());
    }
}
