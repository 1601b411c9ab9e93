use super::*;
use crate::datatype::LogicalType;
use crate::generator::GeneratorRegistry;
use sr_core::{ChangeLogContext, ChangeSetId, CheckSum, HostIdentity, StarRocksDialect, TableName};

fn context() -> ChangeLogContext {
    ChangeLogContext::new("analytics").unwrap()
}

fn render(stmt: Statement) -> Vec<String> {
    let changelog = context();
    let ctx = GeneratorContext::new(&StarRocksDialect, &changelog);
    GeneratorRegistry::with_starrocks()
        .generate(&stmt, &ctx)
        .unwrap()
        .into_iter()
        .map(Sql::into_text)
        .collect()
}

fn assert_parses_as_mysql(sql: &str) {
    let dialect = sqlparser::dialect::MySqlDialect {};
    if let Err(e) = sqlparser::parser::Parser::parse_sql(&dialect, sql) {
        panic!("generated SQL does not parse: {e}\n{sql}");
    }
}

#[test]
fn test_create_lock_table() {
    let sql = render(Statement::CreateChangeLogLockTable);
    assert_eq!(
        sql,
        vec![
            "CREATE TABLE IF NOT EXISTS `analytics`.DATABASECHANGELOGLOCK (\
             ID INT NOT NULL, LOCKED TINYINT NOT NULL, LOCKGRANTED DATETIME, LOCKEDBY VARCHAR(255)\
             ) ENGINE = OLAP PRIMARY KEY (ID) PROPERTIES (\"replication_num\"=\"1\")"
        ]
    );
}

#[test]
fn test_create_changelog_table() {
    let sql = render(Statement::CreateChangeLogTable);
    assert_eq!(sql.len(), 1);
    let ddl = &sql[0];
    assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS `analytics`.DATABASECHANGELOG ("));
    for column in sr_core::changelog::CHANGELOG_COLUMNS {
        assert!(ddl.contains(&format!("{column} ")), "missing {column}");
    }
    assert!(ddl.contains("MD5SUM VARCHAR(35)"));
    assert!(ddl.ends_with(
        r#") ENGINE = OLAP PRIMARY KEY (ID, AUTHOR, FILENAME) PROPERTIES ("replication_num"="1")"#
    ));
}

#[test]
fn test_create_table_uses_context_properties() {
    let changelog = context().with_table_properties(
        [
            ("replication_num".to_string(), "3".to_string()),
            ("storage_medium".to_string(), "SSD".to_string()),
        ]
        .into_iter()
        .collect(),
    );
    let ctx = GeneratorContext::new(&StarRocksDialect, &changelog);
    let sql = create_lock_table(&Statement::CreateChangeLogLockTable, &ctx).unwrap();
    assert!(sql[0]
        .text()
        .ends_with(r#"PROPERTIES ("replication_num"="3", "storage_medium"="SSD")"#));
}

#[test]
fn test_initialize_lock_table_guards_delete() {
    let sql = render(Statement::InitializeChangeLogLockTable);
    assert_eq!(
        sql,
        vec![
            "DELETE FROM `analytics`.DATABASECHANGELOGLOCK WHERE ID IS NOT NULL",
            "INSERT INTO `analytics`.DATABASECHANGELOGLOCK (ID, LOCKED) VALUES (1, false)",
        ]
    );
    sql.iter().for_each(|s| assert_parses_as_mysql(s));
}

#[test]
fn test_lock_changelog() {
    let sql = render(Statement::LockChangeLog {
        host: HostIdentity::new("h1", "desc", "addr"),
    });
    assert_eq!(
        sql,
        vec![
            "UPDATE `analytics`.DATABASECHANGELOGLOCK SET LOCKED = true, \
             LOCKEDBY = 'h1 desc (addr)', LOCKGRANTED = NOW() \
             WHERE ID = 1 AND LOCKED = false"
        ]
    );
    assert_parses_as_mysql(&sql[0]);
}

#[test]
fn test_lock_changelog_escapes_holder() {
    let sql = render(Statement::LockChangeLog {
        host: HostIdentity::new("o'brien", "", "10.0.0.1"),
    });
    assert!(sql[0].contains("LOCKEDBY = 'o''brien  (10.0.0.1)'"));
    assert_parses_as_mysql(&sql[0]);
}

#[test]
fn test_unlock_changelog() {
    let sql = render(Statement::UnlockChangeLog);
    assert_eq!(
        sql,
        vec![
            "UPDATE `analytics`.DATABASECHANGELOGLOCK SET LOCKED = false, \
             LOCKEDBY = NULL, LOCKGRANTED = NULL WHERE ID = 1 AND LOCKED = true"
        ]
    );
    assert_parses_as_mysql(&sql[0]);
}

#[test]
fn test_remove_ran_status() {
    let sql = render(Statement::RemoveChangeSetRanStatus {
        change_set: ChangeSetId::new("1", "alice", "db/changelog.yaml"),
    });
    assert_eq!(
        sql,
        vec![
            "DELETE FROM `analytics`.DATABASECHANGELOG WHERE ID = '1' \
             AND AUTHOR = 'alice' AND FILENAME = 'db/changelog.yaml'"
        ]
    );
    assert_parses_as_mysql(&sql[0]);
}

#[test]
fn test_update_checksum_writes_new_value() {
    let checksum: CheckSum = "9:0a1b2c3d".parse().unwrap();
    let sql = render(Statement::UpdateChangeSetChecksum {
        change_set: ChangeSetId::new("2", "bob", "db/changelog.yaml"),
        checksum,
    });
    assert_eq!(
        sql,
        vec![
            "UPDATE `analytics`.DATABASECHANGELOG SET MD5SUM = '9:0a1b2c3d' \
             WHERE ID = '2' AND AUTHOR = 'bob' AND FILENAME = 'db/changelog.yaml'"
        ]
    );
    assert_parses_as_mysql(&sql[0]);
}

#[test]
fn test_tag_database_targets_latest_row() {
    let sql = render(Statement::TagDatabase {
        tag: "v1.0".to_string(),
    });
    assert_eq!(sql.len(), 1);
    let update = &sql[0];
    assert!(update.starts_with("UPDATE `analytics`.DATABASECHANGELOG SET TAG = 'v1.0' WHERE"));
    assert!(update.contains(
        "DATEEXECUTED = (SELECT DATEEXECUTED FROM `analytics`.DATABASECHANGELOG \
         ORDER BY DATEEXECUTED DESC, ORDEREXECUTED DESC LIMIT 1)"
    ));
    assert!(update.contains(
        "ORDEREXECUTED = (SELECT ORDEREXECUTED FROM `analytics`.DATABASECHANGELOG \
         ORDER BY DATEEXECUTED DESC, ORDEREXECUTED DESC LIMIT 1)"
    ));
    assert!(!update.contains("JOIN"));
    assert_parses_as_mysql(update);
}

#[test]
fn test_tag_database_escapes_tag() {
    let sql = render(Statement::TagDatabase {
        tag: "it's".to_string(),
    });
    assert!(sql[0].contains("SET TAG = 'it''s'"));
}

#[test]
fn test_modify_data_type_is_noop() {
    for new_type in [LogicalType::BigInt, LogicalType::Varchar(1024)] {
        let sql = render(Statement::ModifyDataType {
            table: TableName::new("DATABASECHANGELOG").unwrap(),
            column: "MD5SUM".to_string(),
            new_type,
        });
        assert!(sql.is_empty());
    }
}

#[test]
fn test_generator_rejects_other_statement() {
    let changelog = context();
    let ctx = GeneratorContext::new(&StarRocksDialect, &changelog);
    let err = lock_changelog(&Statement::UnlockChangeLog, &ctx).unwrap_err();
    assert!(matches!(
        err,
        crate::SqlError::StatementMismatch {
            expected: StatementKind::LockChangeLog,
            found: StatementKind::UnlockChangeLog,
        }
    ));
}

#[test]
fn test_every_override_outranks_default() {
    for generator in generators() {
        assert_eq!(generator.dialect, Some(DialectTag::StarRocks));
        assert!(generator.priority > sr_core::PRIORITY_DEFAULT);
    }
}
