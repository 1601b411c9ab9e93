use super::*;
use crate::testing::{text_row, MockDatabase};
use sr_core::{ChangeLogContext, MySqlDialect, StarRocksDialect};

fn service_for(db: &Arc<MockDatabase>, dialect: &'static dyn sr_core::Dialect) -> ChangeLogService {
    let changelog = ChangeLogContext::new("analytics").unwrap();
    ChangeLogService::new(Arc::new(Executor::new(db.clone(), dialect, changelog)))
}

fn service(db: &Arc<MockDatabase>) -> ChangeLogService {
    service_for(db, &StarRocksDialect)
}

fn full_row(id: &str, checksum: Option<&str>) -> Vec<Option<String>> {
    text_row(&[
        Some(id),
        Some("alice"),
        Some("db/changelog.yaml"),
        Some("2024-05-01 13:04:05"),
        Some(id),
        Some("EXECUTED"),
        checksum,
        Some("createTable name=orders"),
        None,
        None,
        Some("4.29.0"),
        None,
        None,
        Some("4567890123"),
    ])
}

#[tokio::test]
async fn test_init_creates_missing_table() {
    let db = Arc::new(
        MockDatabase::starrocks().on_rows(Err(DbError::TableNotFound("missing".to_string()))),
    );
    let mut changelog = service(&db);
    changelog.init().await.unwrap();

    let executed = db.executed();
    assert_eq!(executed.len(), 1);
    assert!(executed[0].starts_with("CREATE TABLE IF NOT EXISTS `analytics`.DATABASECHANGELOG ("));
    assert!(changelog.has_table().await.unwrap());
}

#[tokio::test]
async fn test_init_existing_table_widening_is_absorbed_on_starrocks() {
    let db = Arc::new(MockDatabase::starrocks());
    let mut changelog = service(&db);
    changelog.init().await.unwrap();
    assert!(db.executed().is_empty());
}

#[tokio::test]
async fn test_init_existing_table_widens_columns_on_mysql() {
    let db = Arc::new(MockDatabase::new("mysql://root@db:3306/analytics"));
    let mut changelog = service_for(&db, &MySqlDialect);
    changelog.init().await.unwrap();
    assert_eq!(
        db.executed(),
        vec![
            "ALTER TABLE `analytics`.DATABASECHANGELOG MODIFY MD5SUM VARCHAR(35)",
            "ALTER TABLE `analytics`.DATABASECHANGELOG MODIFY DESCRIPTION VARCHAR(255)",
            "ALTER TABLE `analytics`.DATABASECHANGELOG MODIFY TAG VARCHAR(255)",
            "ALTER TABLE `analytics`.DATABASECHANGELOG MODIFY LIQUIBASE VARCHAR(20)",
        ]
    );
}

#[tokio::test]
async fn test_ran_change_sets_decodes_rows() {
    let db = Arc::new(
        MockDatabase::starrocks()
            .on_rows(Ok(Vec::new()))
            .on_rows(Ok(vec![
                full_row("1", Some("9:0a1b2c3d")),
                full_row("2", Some("not-a-checksum")),
            ])),
    );
    let mut changelog = service(&db);

    let entries = changelog.ran_change_sets().await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(
        entries[0].change_set,
        ChangeSetId::new("1", "alice", "db/changelog.yaml")
    );
    assert_eq!(entries[0].exec_type, Some(ExecType::Executed));
    assert_eq!(entries[0].order_executed, Some(1));
    assert_eq!(
        entries[0].checksum.as_ref().map(ToString::to_string).as_deref(),
        Some("9:0a1b2c3d")
    );
    assert_eq!(entries[0].version_label.as_deref(), Some("4.29.0"));
    assert!(!entries[0].is_tagged());
    assert_eq!(entries[1].checksum, None);

    assert!(db.queried()[1].ends_with("ORDER BY DATEEXECUTED ASC, ORDEREXECUTED ASC"));
}

#[tokio::test]
async fn test_ran_change_sets_without_table() {
    let db = Arc::new(
        MockDatabase::starrocks().on_rows(Err(DbError::TableNotFound("missing".to_string()))),
    );
    let mut changelog = service(&db);
    assert!(changelog.ran_change_sets().await.unwrap().is_empty());
    assert_eq!(db.queried().len(), 1);
}

#[tokio::test]
async fn test_ran_change_sets_rejects_null_key() {
    let mut row = full_row("1", None);
    row[1] = None;
    let db = Arc::new(
        MockDatabase::starrocks()
            .on_rows(Ok(Vec::new()))
            .on_rows(Ok(vec![row])),
    );
    let mut changelog = service(&db);
    let err = changelog.ran_change_sets().await.unwrap_err();
    assert!(matches!(err, DbError::InvalidRow { .. }));
}

#[tokio::test]
async fn test_row_edits() {
    let db = Arc::new(MockDatabase::starrocks());
    let changelog = service(&db);
    let id = ChangeSetId::new("7", "bob", "db/changelog.yaml");

    changelog.remove_ran_status(&id).await.unwrap();
    changelog
        .update_checksum(&id, "9:ffee".parse().unwrap())
        .await
        .unwrap();
    changelog.tag("v1.0").await.unwrap();

    let executed = db.executed();
    assert_eq!(
        executed[0],
        "DELETE FROM `analytics`.DATABASECHANGELOG WHERE ID = '7' \
         AND AUTHOR = 'bob' AND FILENAME = 'db/changelog.yaml'"
    );
    assert!(executed[1].contains("SET MD5SUM = '9:ffee'"));
    assert!(executed[2].starts_with("UPDATE `analytics`.DATABASECHANGELOG SET TAG = 'v1.0'"));
}

#[test]
fn test_table_name() {
    let db = Arc::new(MockDatabase::starrocks());
    assert_eq!(service(&db).table_name().as_str(), "DATABASECHANGELOG");
}
