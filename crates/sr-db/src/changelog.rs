//! Change-log service
//!
//! Creates the change-log table, reads which change sets have run, and
//! edits individual rows (forget, re-checksum, tag).

use std::sync::Arc;

use sr_core::{ChangeLogEntry, ChangeSetId, CheckSum, ExecType, TableName};
use sr_sql::{LogicalType, Statement};

use crate::error::{DbError, DbResult};
use crate::executor::Executor;
use crate::row::RowReader;

/// Columns widened when an existing change-log table is upgraded
const WIDENED_COLUMNS: [(&str, LogicalType); 4] = [
    ("MD5SUM", LogicalType::Varchar(35)),
    ("DESCRIPTION", LogicalType::Varchar(255)),
    ("TAG", LogicalType::Varchar(255)),
    ("LIQUIBASE", LogicalType::Varchar(20)),
];

/// Change-log service for one migration run
pub struct ChangeLogService {
    executor: Arc<Executor>,
    has_table: Option<bool>,
}

impl ChangeLogService {
    pub fn new(executor: Arc<Executor>) -> Self {
        Self {
            executor,
            has_table: None,
        }
    }

    fn table(&self) -> String {
        self.executor.context().changelog_table()
    }

    /// Whether the change-log table exists. Probed once, then cached.
    pub async fn has_table(&mut self) -> DbResult<bool> {
        if let Some(exists) = self.has_table {
            return Ok(exists);
        }

        let table = self.table();
        let probe = format!("SELECT ID FROM {table} LIMIT 1");
        let exists = match self.executor.db().query_rows(&probe).await {
            Ok(_) => true,
            Err(e @ (DbError::TableNotFound(_) | DbError::Offline(_))) => {
                log::info!("No {table} table available ({e})");
                false
            }
            Err(e) => return Err(e),
        };
        self.has_table = Some(exists);
        Ok(exists)
    }

    /// Create the table when missing, otherwise bring its columns up to
    /// the current widths.
    pub async fn init(&mut self) -> DbResult<()> {
        if !self.has_table().await? {
            self.executor.execute(&Statement::CreateChangeLogTable).await?;
            log::info!("Created change log table {}", self.table());
            self.has_table = Some(true);
            return Ok(());
        }

        let table = self.executor.changelog().changelog_table.clone();
        for (column, new_type) in WIDENED_COLUMNS {
            self.executor
                .execute(&Statement::ModifyDataType {
                    table: table.clone(),
                    column: column.to_string(),
                    new_type,
                })
                .await?;
        }
        Ok(())
    }

    /// Every change-log row, oldest first
    pub async fn ran_change_sets(&mut self) -> DbResult<Vec<ChangeLogEntry>> {
        if !self.has_table().await? {
            return Ok(Vec::new());
        }

        let table = self.table();
        let rows = self.executor.query(&Statement::SelectRanChangeSets).await?;
        rows.iter()
            .map(|cells| change_log_entry(&RowReader::new(&table, cells)))
            .collect()
    }

    /// Forget that `change_set` ran; returns affected rows
    pub async fn remove_ran_status(&self, change_set: &ChangeSetId) -> DbResult<u64> {
        log::info!("Removing ran status of {change_set}");
        self.executor
            .execute(&Statement::RemoveChangeSetRanStatus {
                change_set: change_set.clone(),
            })
            .await
    }

    /// Store a recomputed check-sum for `change_set`
    pub async fn update_checksum(
        &self,
        change_set: &ChangeSetId,
        checksum: CheckSum,
    ) -> DbResult<u64> {
        log::debug!("Updating check-sum of {change_set} to {checksum}");
        self.executor
            .execute(&Statement::UpdateChangeSetChecksum {
                change_set: change_set.clone(),
                checksum,
            })
            .await
    }

    /// Tag the most recently executed change set
    pub async fn tag(&self, tag: &str) -> DbResult<u64> {
        let affected = self
            .executor
            .execute(&Statement::TagDatabase {
                tag: tag.to_string(),
            })
            .await?;
        if affected == 0 && self.executor.db().updates_database() {
            log::warn!("Tag '{tag}' matched no change-log row");
        }
        Ok(affected)
    }

    /// Name of the change-log table, unqualified
    pub fn table_name(&self) -> &TableName {
        &self.executor.changelog().changelog_table
    }
}

fn change_log_entry(row: &RowReader<'_>) -> DbResult<ChangeLogEntry> {
    let change_set = ChangeSetId::new(
        row.str(0, "ID")?,
        row.str(1, "AUTHOR")?,
        row.str(2, "FILENAME")?,
    );

    let exec_type = row
        .opt_str(5)
        .map(str::parse::<ExecType>)
        .transpose()?;

    // Rows written by older tools may carry an unversioned digest
    let checksum = match row.opt_str(6).map(str::parse::<CheckSum>) {
        Some(Ok(checksum)) => Some(checksum),
        Some(Err(e)) => {
            log::warn!("Ignoring stored check-sum of {change_set}: {e}");
            None
        }
        None => None,
    };

    Ok(ChangeLogEntry {
        date_executed: row.opt_datetime(3, "DATEEXECUTED")?,
        order_executed: row.opt_i64(4, "ORDEREXECUTED")?,
        exec_type,
        checksum,
        description: row.opt_string(7),
        comments: row.opt_string(8),
        tag: row.opt_string(9),
        version_label: row.opt_string(10),
        contexts: row.opt_string(11),
        labels: row.opt_string(12),
        deployment_id: row.opt_string(13),
        change_set,
    })
}

#[cfg(test)]
#[path = "changelog_test.rs"]
mod tests;
