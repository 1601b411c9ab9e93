//! Statements understood by the generator registry

use std::fmt;

use sr_core::{ChangeSetId, CheckSum, HostIdentity, TableName};

use crate::datatype::LogicalType;

/// A change-log or lock operation to be rendered as SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Create the lock table if it does not exist
    CreateChangeLogLockTable,
    /// Create the change-log table if it does not exist
    CreateChangeLogTable,
    /// Clear the lock table and insert the single unlocked row
    InitializeChangeLogLockTable,
    /// Take the lock if it is free
    LockChangeLog { host: HostIdentity },
    /// Release the lock if it is held
    UnlockChangeLog,
    /// Read the lock row
    SelectLockRows,
    /// Read every change-log row in execution order
    SelectRanChangeSets,
    /// Forget that a change set ran
    RemoveChangeSetRanStatus { change_set: ChangeSetId },
    /// Store a new check-sum for a change set
    UpdateChangeSetChecksum {
        change_set: ChangeSetId,
        checksum: CheckSum,
    },
    /// Tag the most recently executed change set
    TagDatabase { tag: String },
    /// Change a column's data type
    ModifyDataType {
        table: TableName,
        column: String,
        new_type: LogicalType,
    },
}

/// Field-less discriminant of [`Statement`], used as the registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatementKind {
    CreateChangeLogLockTable,
    CreateChangeLogTable,
    InitializeChangeLogLockTable,
    LockChangeLog,
    UnlockChangeLog,
    SelectLockRows,
    SelectRanChangeSets,
    RemoveChangeSetRanStatus,
    UpdateChangeSetChecksum,
    TagDatabase,
    ModifyDataType,
}

impl Statement {
    pub fn kind(&self) -> StatementKind {
        match self {
            Statement::CreateChangeLogLockTable => StatementKind::CreateChangeLogLockTable,
            Statement::CreateChangeLogTable => StatementKind::CreateChangeLogTable,
            Statement::InitializeChangeLogLockTable => StatementKind::InitializeChangeLogLockTable,
            Statement::LockChangeLog { .. } => StatementKind::LockChangeLog,
            Statement::UnlockChangeLog => StatementKind::UnlockChangeLog,
            Statement::SelectLockRows => StatementKind::SelectLockRows,
            Statement::SelectRanChangeSets => StatementKind::SelectRanChangeSets,
            Statement::RemoveChangeSetRanStatus { .. } => StatementKind::RemoveChangeSetRanStatus,
            Statement::UpdateChangeSetChecksum { .. } => StatementKind::UpdateChangeSetChecksum,
            Statement::TagDatabase { .. } => StatementKind::TagDatabase,
            Statement::ModifyDataType { .. } => StatementKind::ModifyDataType,
        }
    }
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::CreateChangeLogLockTable => "create_changelog_lock_table",
            StatementKind::CreateChangeLogTable => "create_changelog_table",
            StatementKind::InitializeChangeLogLockTable => "initialize_changelog_lock_table",
            StatementKind::LockChangeLog => "lock_changelog",
            StatementKind::UnlockChangeLog => "unlock_changelog",
            StatementKind::SelectLockRows => "select_lock_rows",
            StatementKind::SelectRanChangeSets => "select_ran_change_sets",
            StatementKind::RemoveChangeSetRanStatus => "remove_change_set_ran_status",
            StatementKind::UpdateChangeSetChecksum => "update_change_set_checksum",
            StatementKind::TagDatabase => "tag_database",
            StatementKind::ModifyDataType => "modify_data_type",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
