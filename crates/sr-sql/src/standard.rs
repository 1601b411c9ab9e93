//! Standard MySQL generators
//!
//! Registered at [`PRIORITY_DEFAULT`] for every dialect. StarRocks only
//! relies on the two `SELECT`s here; every other kind is overridden.

use sr_core::changelog::{CHANGELOG_COLUMNS, LOCK_COLUMNS, LOCK_ROW_ID};
use sr_core::PRIORITY_DEFAULT;

use crate::datatype::{LogicalType, TypeRegistry};
use crate::error::SqlResult;
use crate::generator::{mismatch, GenerateFn, Generator, GeneratorContext};
use crate::sql::Sql;
use crate::statement::{Statement, StatementKind};

/// All standard generators, in registration order.
pub fn generators() -> Vec<Generator> {
    vec![
        standard(
            "create_lock_table",
            StatementKind::CreateChangeLogLockTable,
            create_lock_table,
        ),
        standard(
            "create_changelog_table",
            StatementKind::CreateChangeLogTable,
            create_changelog_table,
        ),
        standard(
            "initialize_lock_table",
            StatementKind::InitializeChangeLogLockTable,
            initialize_lock_table,
        ),
        standard("lock_changelog", StatementKind::LockChangeLog, lock_changelog),
        standard(
            "unlock_changelog",
            StatementKind::UnlockChangeLog,
            unlock_changelog,
        ),
        standard(
            "select_lock_rows",
            StatementKind::SelectLockRows,
            select_lock_rows,
        ),
        standard(
            "select_ran_change_sets",
            StatementKind::SelectRanChangeSets,
            select_ran_change_sets,
        ),
        standard(
            "remove_ran_status",
            StatementKind::RemoveChangeSetRanStatus,
            remove_ran_status,
        ),
        standard(
            "update_checksum",
            StatementKind::UpdateChangeSetChecksum,
            update_checksum,
        ),
        standard("tag_database", StatementKind::TagDatabase, tag_database),
        standard(
            "modify_data_type",
            StatementKind::ModifyDataType,
            modify_data_type,
        ),
    ]
}

fn standard(name: &'static str, kind: StatementKind, generate: GenerateFn) -> Generator {
    Generator {
        name,
        kind,
        dialect: None,
        priority: PRIORITY_DEFAULT,
        generate,
    }
}

fn column_type(logical: LogicalType, ctx: &GeneratorContext<'_>) -> SqlResult<String> {
    Ok(TypeRegistry::builtin()
        .to_database_type(&logical, ctx.dialect.tag())?
        .to_string())
}

fn create_lock_table(stmt: &Statement, ctx: &GeneratorContext<'_>) -> SqlResult<Vec<Sql>> {
    let Statement::CreateChangeLogLockTable = stmt else {
        return Err(mismatch(StatementKind::CreateChangeLogLockTable, stmt));
    };
    let table = ctx.lock_table();
    let sql = format!(
        "CREATE TABLE {table} (\
         ID {} NOT NULL, \
         LOCKED {} NOT NULL, \
         LOCKGRANTED {} NULL, \
         LOCKEDBY {} NULL, \
         CONSTRAINT PK_{} PRIMARY KEY (ID))",
        column_type(LogicalType::int(), ctx)?,
        column_type(LogicalType::Boolean, ctx)?,
        column_type(LogicalType::DateTime, ctx)?,
        column_type(LogicalType::Varchar(255), ctx)?,
        ctx.changelog.lock_table,
    );
    Ok(vec![Sql::affecting(sql, table)])
}

fn create_changelog_table(stmt: &Statement, ctx: &GeneratorContext<'_>) -> SqlResult<Vec<Sql>> {
    let Statement::CreateChangeLogTable = stmt else {
        return Err(mismatch(StatementKind::CreateChangeLogTable, stmt));
    };
    let table = ctx.changelog_table();
    let varchar = |n| column_type(LogicalType::Varchar(n), ctx);
    let sql = format!(
        "CREATE TABLE {table} (\
         ID {v255} NOT NULL, \
         AUTHOR {v255} NOT NULL, \
         FILENAME {v255} NOT NULL, \
         DATEEXECUTED {datetime} NOT NULL, \
         ORDEREXECUTED {int} NOT NULL, \
         EXECTYPE {v10} NOT NULL, \
         MD5SUM {v35} NULL, \
         DESCRIPTION {v255} NULL, \
         COMMENTS {v255} NULL, \
         TAG {v255} NULL, \
         LIQUIBASE {v20} NULL, \
         CONTEXTS {v255} NULL, \
         LABELS {v255} NULL, \
         DEPLOYMENT_ID {v10} NULL)",
        v255 = varchar(255)?,
        v35 = varchar(35)?,
        v20 = varchar(20)?,
        v10 = varchar(10)?,
        datetime = column_type(LogicalType::DateTime, ctx)?,
        int = column_type(LogicalType::int(), ctx)?,
    );
    Ok(vec![Sql::affecting(sql, table)])
}

fn initialize_lock_table(stmt: &Statement, ctx: &GeneratorContext<'_>) -> SqlResult<Vec<Sql>> {
    let Statement::InitializeChangeLogLockTable = stmt else {
        return Err(mismatch(StatementKind::InitializeChangeLogLockTable, stmt));
    };
    let table = ctx.lock_table();
    Ok(vec![
        Sql::affecting(format!("DELETE FROM {table}"), &table),
        Sql::affecting(
            format!("INSERT INTO {table} (ID, LOCKED) VALUES ({LOCK_ROW_ID}, 0)"),
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
        "UPDATE {table} SET LOCKED = 1, LOCKEDBY = {}, LOCKGRANTED = {} \
         WHERE ID = {LOCK_ROW_ID} AND LOCKED = 0",
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
        "UPDATE {table} SET LOCKED = 0, LOCKEDBY = NULL, LOCKGRANTED = NULL \
         WHERE ID = {LOCK_ROW_ID}"
    );
    Ok(vec![Sql::affecting(sql, table)])
}

fn select_lock_rows(stmt: &Statement, ctx: &GeneratorContext<'_>) -> SqlResult<Vec<Sql>> {
    let Statement::SelectLockRows = stmt else {
        return Err(mismatch(StatementKind::SelectLockRows, stmt));
    };
    let table = ctx.lock_table();
    let sql = format!(
        "SELECT {} FROM {table} WHERE ID = {LOCK_ROW_ID}",
        LOCK_COLUMNS.join(", ")
    );
    Ok(vec![Sql::affecting(sql, table)])
}

fn select_ran_change_sets(stmt: &Statement, ctx: &GeneratorContext<'_>) -> SqlResult<Vec<Sql>> {
    let Statement::SelectRanChangeSets = stmt else {
        return Err(mismatch(StatementKind::SelectRanChangeSets, stmt));
    };
    let table = ctx.changelog_table();
    let sql = format!(
        "SELECT {} FROM {table} ORDER BY DATEEXECUTED ASC, ORDEREXECUTED ASC",
        CHANGELOG_COLUMNS.join(", ")
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
    let sql = format!(
        "UPDATE {table} AS C INNER JOIN (\
         SELECT ID, AUTHOR, FILENAME FROM {table} \
         ORDER BY DATEEXECUTED DESC, ORDEREXECUTED DESC LIMIT 1\
         ) AS D ON C.ID = D.ID AND C.AUTHOR = D.AUTHOR AND C.FILENAME = D.FILENAME \
         SET C.TAG = {}",
        ctx.dialect.escape_string_literal(tag),
    );
    Ok(vec![Sql::affecting(sql, table)])
}

fn modify_data_type(stmt: &Statement, ctx: &GeneratorContext<'_>) -> SqlResult<Vec<Sql>> {
    let Statement::ModifyDataType {
        table,
        column,
        new_type,
    } = stmt
    else {
        return Err(mismatch(StatementKind::ModifyDataType, stmt));
    };
    let table = ctx
        .dialect
        .escape_table_name(&ctx.changelog.schema, table);
    let sql = format!(
        "ALTER TABLE {table} MODIFY {column} {}",
        column_type(*new_type, ctx)?
    );
    Ok(vec![Sql::affecting(sql, table)])
}

#[cfg(test)]
#[path = "standard_test.rs"]
mod tests;
