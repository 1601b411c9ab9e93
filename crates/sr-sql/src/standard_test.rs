use super::*;
use crate::generator::GeneratorRegistry;
use sr_core::{ChangeLogContext, HostIdentity, MySqlDialect, StarRocksDialect, TableName};

fn render_mysql(stmt: Statement) -> Vec<String> {
    let changelog = ChangeLogContext::new("app").unwrap();
    let ctx = GeneratorContext::new(&MySqlDialect, &changelog);
    GeneratorRegistry::standard()
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
fn test_create_lock_table_uses_bit_flag() {
    let sql = render_mysql(Statement::CreateChangeLogLockTable);
    assert_eq!(
        sql,
        vec![
            "CREATE TABLE `app`.DATABASECHANGELOGLOCK (ID INT NOT NULL, LOCKED BIT(1) NOT NULL, \
             LOCKGRANTED DATETIME NULL, LOCKEDBY VARCHAR(255) NULL, \
             CONSTRAINT PK_DATABASECHANGELOGLOCK PRIMARY KEY (ID))"
        ]
    );
    assert_parses_as_mysql(&sql[0]);
}

#[test]
fn test_create_changelog_table() {
    let sql = render_mysql(Statement::CreateChangeLogTable);
    assert!(sql[0].contains("MD5SUM VARCHAR(35) NULL"));
    assert!(!sql[0].contains("ENGINE"));
    assert_parses_as_mysql(&sql[0]);
}

#[test]
fn test_initialize_lock_table_unguarded_delete() {
    let sql = render_mysql(Statement::InitializeChangeLogLockTable);
    assert_eq!(
        sql,
        vec![
            "DELETE FROM `app`.DATABASECHANGELOGLOCK",
            "INSERT INTO `app`.DATABASECHANGELOGLOCK (ID, LOCKED) VALUES (1, 0)",
        ]
    );
}

#[test]
fn test_lock_and_unlock() {
    let lock = render_mysql(Statement::LockChangeLog {
        host: HostIdentity::new("h1", "desc", "addr"),
    });
    assert_eq!(
        lock,
        vec![
            "UPDATE `app`.DATABASECHANGELOGLOCK SET LOCKED = 1, LOCKEDBY = 'h1 desc (addr)', \
             LOCKGRANTED = NOW() WHERE ID = 1 AND LOCKED = 0"
        ]
    );
    let unlock = render_mysql(Statement::UnlockChangeLog);
    assert!(unlock[0].ends_with("WHERE ID = 1"));
    assert_parses_as_mysql(&lock[0]);
    assert_parses_as_mysql(&unlock[0]);
}

#[test]
fn test_select_statements() {
    let lock_rows = render_mysql(Statement::SelectLockRows);
    assert_eq!(
        lock_rows,
        vec!["SELECT ID, LOCKED, LOCKGRANTED, LOCKEDBY FROM `app`.DATABASECHANGELOGLOCK WHERE ID = 1"]
    );

    let ran = render_mysql(Statement::SelectRanChangeSets);
    assert!(ran[0].starts_with("SELECT ID, AUTHOR, FILENAME, DATEEXECUTED,"));
    assert!(ran[0].ends_with("ORDER BY DATEEXECUTED ASC, ORDEREXECUTED ASC"));
    assert_parses_as_mysql(&lock_rows[0]);
    assert_parses_as_mysql(&ran[0]);
}

#[test]
fn test_tag_database_uses_join() {
    let sql = render_mysql(Statement::TagDatabase {
        tag: "release".to_string(),
    });
    assert!(sql[0].contains("INNER JOIN"));
    assert!(sql[0].ends_with("SET C.TAG = 'release'"));
}

#[test]
fn test_modify_data_type_on_mysql() {
    let sql = render_mysql(Statement::ModifyDataType {
        table: TableName::new("DATABASECHANGELOG").unwrap(),
        column: "ORDEREXECUTED".to_string(),
        new_type: LogicalType::Int {
            display_width: Some(11),
        },
    });
    assert_eq!(
        sql,
        vec!["ALTER TABLE `app`.DATABASECHANGELOG MODIFY ORDEREXECUTED INT(11)"]
    );
}

#[test]
fn test_select_statements_apply_to_starrocks() {
    let changelog = ChangeLogContext::new("analytics").unwrap();
    let ctx = GeneratorContext::new(&StarRocksDialect, &changelog);
    let sql = GeneratorRegistry::with_starrocks()
        .generate(&Statement::SelectLockRows, &ctx)
        .unwrap();
    assert_eq!(
        sql[0].text(),
        "SELECT ID, LOCKED, LOCKGRANTED, LOCKEDBY FROM `analytics`.DATABASECHANGELOGLOCK WHERE ID = 1"
    );
}
