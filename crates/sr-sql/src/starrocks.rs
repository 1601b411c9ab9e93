//! StarRocks generator overrides
//!
//! StarRocks stores the change-log tables as OLAP primary-key tables. It
//! cannot delete without a predicate, has no `BIT` type, and does not
//! support `ALTER TABLE ... MODIFY` for the widening the standard
//! change-log upgrade path issues. These generators register at
//! [`PRIORITY_DATABASE`] and apply only to the StarRocks dialect.

use sr_core::changelog::LOCK_ROW_ID;
use sr_core::{DialectTag, PRIORITY_DATABASE};

use crate::error::SqlResult;
use crate::generator::{mismatch, GenerateFn, Generator, GeneratorContext};
use crate::params::TableParams;
use crate::sql::Sql;
use crate::statement::{Statement, StatementKind};

/// Storage engine of the change-log tables
pub const ENGINE: &str = "OLAP";

/// Primary key of the lock table
pub const LOCK_TABLE_KEY: &str = "ID";

/// Primary key of the change-log table
pub const CHANGELOG_TABLE_KEY: &str = "ID, AUTHOR, FILENAME";

/// All StarRocks overrides, in registration order.
pub fn generators() -> Vec<Generator> {
    vec![
        starrocks(
            "starrocks_create_lock_table",
            StatementKind::CreateChangeLogLockTable,
            create_lock_table,
        ),
        starrocks(
            "starrocks_create_changelog_table",
            StatementKind::CreateChangeLogTable,
            create_changelog_table,
        ),
        starrocks(
            "starrocks_initialize_lock_table",
            StatementKind::InitializeChangeLogLockTable,
            initialize_lock_table,
        ),
        starrocks(
            "starrocks_lock_changelog",
            StatementKind::LockChangeLog,
            lock_changelog,
        ),
        starrocks(
            "starrocks_unlock_changelog",
            StatementKind::UnlockChangeLog,
            unlock_changelog,
        ),
        starrocks(
            "starrocks_remove_ran_status",
            StatementKind::RemoveChangeSetRanStatus,
            remove_ran_status,
        ),
        starrocks(
            "starrocks_update_checksum",
            StatementKind::UpdateChangeSetChecksum,
            update_checksum,
        ),
        starrocks(
            "starrocks_tag_database",
            StatementKind::TagDatabase,
            tag_database,
        ),
        starrocks(
            "starrocks_modify_data_type",
            StatementKind::ModifyDataType,
            modify_data_type,
        ),
    ]
}

fn starrocks(name: &'static str, kind: StatementKind, generate: GenerateFn) -> Generator {
    Generator {
        name,
        kind,
        dialect: Some(DialectTag::StarRocks),
        priority: PRIORITY_DATABASE,
        generate,
    }
}

fn table_params(ctx: &GeneratorContext<'_>, key: &str) -> TableParams {
    TableParams::new()
        .engine(ENGINE)
        .primary_key(key)
        .properties(ctx.changelog.table_properties.clone())
}

fn create_lock_table(stmt: &Statement, ctx: &GeneratorContext<'_>) -> SqlResult<Vec<Sql>> {
    let Statement::CreateChangeLogLockTable = stmt else {
        return Err(mismatch(StatementKind::CreateChangeLogLockTable, stmt));
    };
    let table = ctx.lock_table();
    let sql = format!(
        "CREATE TABLE IF NOT EXISTS {table} (\
         ID INT NOT NULL, \
         LOCKED TINYINT NOT NULL, \
         LOCKGRANTED DATETIME, \
         LOCKEDBY VARCHAR(255)\
         ){}",
        table_params(ctx, LOCK_TABLE_KEY).generate_sql()
    );
    Ok(vec![Sql::affecting(sql, table)])
}

fn create_changelog_table(stmt: &Statement, ctx: &GeneratorContext<'_>) -> SqlResult<Vec<Sql>> {
    let Statement::CreateChangeLogTable = stmt else {
        return Err(mismatch(StatementKind::CreateChangeLogTable, stmt));
    };
    let table = ctx.changelog_table();
    let sql = format!(
        "CREATE TABLE IF NOT EXISTS {table} (\
         ID VARCHAR(255) NOT NULL, \
         AUTHOR VARCHAR(255) NOT NULL, \
         FILENAME VARCHAR(255) NOT NULL, \
         DATEEXECUTED DATETIME, \
         ORDEREXECUTED BIGINT, \
         EXECTYPE VARCHAR(10), \
         MD5SUM VARCHAR(35), \
         DESCRIPTION VARCHAR(255), \
         COMMENTS VARCHAR(255), \
         TAG VARCHAR(255), \
         LIQUIBASE VARCHAR(20), \
         CONTEXTS VARCHAR(255), \
         LABELS VARCHAR(255), \
         DEPLOYMENT_ID VARCHAR(10)\
         ){}",
        table_params(ctx, CHANGELOG_TABLE_KEY).generate_sql()
    );
    Ok(vec![Sql::affecting(sql, table)])
}

fn initialize_lock_table(stmt: &Statement, ctx: &GeneratorContext<'_>) -> SqlResult<Vec<Sql>> {
    let Statement::InitializeChangeLogLockTable = stmt else {
        return Err(mismatch(StatementKind::InitializeChangeLogLockTable, stmt));
    };
    let table = ctx.lock_table();
    // A bare DELETE is rejected on primary-key tables
    Ok(vec![
        Sql::affecting(format!("DELETE FROM {table} WHERE ID IS NOT NULL"), &table),
        Sql::affecting(
            format!("INSERT INTO {table} (ID, LOCKED) VALUES ({LOCK_ROW_ID}, false)"),
            &table,
        ),
    ])
}

fn lock_changelog(stmt: &Statement, ctx: &GeneratorContext<'_>) -> SqlResult<Vec<Sql>> {
    let Statement::LockChangeLog { host } = stmt else {
        return Err(mismatch(StatementKind::LockChangeLog, stmt));
    };
    let table = ctx.lock_table();
    let sql = format!(
        "UPDATE {table} SET LOCKED = true, LOCKEDBY = {}, LOCKGRANTED = {} \
         WHERE ID = {LOCK_ROW_ID} AND LOCKED = false",
        ctx.dialect.escape_string_literal(&host.lock_holder()),
        ctx.dialect.current_datetime_function(),
    );
    Ok(vec![Sql::affecting(sql, table)])
}

fn unlock_changelog(stmt: &Statement, ctx: &GeneratorContext<'_>) -> SqlResult<Vec<Sql>> {
    let Statement::UnlockChangeLog = stmt else {
        return Err(mismatch(StatementKind::UnlockChangeLog, stmt));
    };
    let table = ctx.lock_table();
    let sql = format!(
        "UPDATE {table} SET LOCKED = false, LOCKEDBY = NULL, LOCKGRANTED = NULL \
         WHERE ID = {LOCK_ROW_ID} AND LOCKED = true"
    );
    Ok(vec![Sql::affecting(sql, table)])
}

fn remove_ran_status(stmt: &Statement, ctx: &GeneratorContext<'_>) -> SqlResult<Vec<Sql>> {
    let Statement::RemoveChangeSetRanStatus { change_set } = stmt else {
        return Err(mismatch(StatementKind::RemoveChangeSetRanStatus, stmt));
    };
    let table = ctx.changelog_table();
    let sql = format!(
        "DELETE FROM {table} WHERE ID = {} AND AUTHOR = {} AND FILENAME = {}",
        ctx.dialect.escape_string_literal(&change_set.id),
        ctx.dialect.escape_string_literal(&change_set.author),
        ctx.dialect.escape_string_literal(&change_set.filename),
    );
    Ok(vec![Sql::affecting(sql, table)])
}

fn update_checksum(stmt: &Statement, ctx: &GeneratorContext<'_>) -> SqlResult<Vec<Sql>> {
    let Statement::UpdateChangeSetChecksum {
        change_set,
        checksum,
    } = stmt
    else {
        return Err(mismatch(StatementKind::UpdateChangeSetChecksum, stmt));
    };
    let table = ctx.changelog_table();
    let sql = format!(
        "UPDATE {table} SET MD5SUM = {} WHERE ID = {} AND AUTHOR = {} AND FILENAME = {}",
        ctx.dialect.escape_string_literal(&checksum.to_string()),
        ctx.dialect.escape_string_literal(&change_set.id),
        ctx.dialect.escape_string_literal(&change_set.author),
        ctx.dialect.escape_string_literal(&change_set.filename),
    );
    Ok(vec![Sql::affecting(sql, table)])
}

fn tag_database(stmt: &Statement, ctx: &GeneratorContext<'_>) -> SqlResult<Vec<Sql>> {
    let Statement::TagDatabase { tag } = stmt else {
        return Err(mismatch(StatementKind::TagDatabase, stmt));
    };
    let table = ctx.changelog_table();
    // No UPDATE ... JOIN; match the latest (DATEEXECUTED, ORDEREXECUTED) pair
    let latest = |column: &str| {
        format!(
            "(SELECT {column} FROM {table} \
             ORDER BY DATEEXECUTED DESC, ORDEREXECUTED DESC LIMIT 1)"
        )
    };
    let sql = format!(
        "UPDATE {table} SET TAG = {} WHERE DATEEXECUTED = {} AND ORDEREXECUTED = {}",
        ctx.dialect.escape_string_literal(tag),
        latest("DATEEXECUTED"),
        latest("ORDEREXECUTED"),
    );
    Ok(vec![Sql::affecting(sql, table)])
}

fn modify_data_type(stmt: &Statement, _ctx: &GeneratorContext<'_>) -> SqlResult<Vec<Sql>> {
    let Statement::ModifyDataType { table, column, .. } = stmt else {
        return Err(mismatch(StatementKind::ModifyDataType, stmt));
    };
    log::debug!("Skipping column type change for {table}.{column} on StarRocks");
    Ok(Vec::new())
}

#[cfg(test)]
#[path = "starrocks_test.rs"]
mod tests;
