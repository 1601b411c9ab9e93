//! Change-log and change-log-lock row models
//!
//! The change-log table records every applied change set, keyed by the
//! `(ID, AUTHOR, FILENAME)` triple. The lock table holds exactly one row
//! with `ID = 1` once initialised.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Fixed ID of the single lock row.
pub const LOCK_ROW_ID: i32 = 1;

/// Width of the `MD5SUM` column.
pub const CHECKSUM_MAX_LEN: usize = 35;

/// Change-log columns in table order.
pub const CHANGELOG_COLUMNS: [&str; 14] = [
    "ID",
    "AUTHOR",
    "FILENAME",
    "DATEEXECUTED",
    "ORDEREXECUTED",
    "EXECTYPE",
    "MD5SUM",
    "DESCRIPTION",
    "COMMENTS",
    "TAG",
    "LIQUIBASE",
    "CONTEXTS",
    "LABELS",
    "DEPLOYMENT_ID",
];

/// Lock table columns in table order.
pub const LOCK_COLUMNS: [&str; 4] = ["ID", "LOCKED", "LOCKGRANTED", "LOCKEDBY"];

/// Composite key of a change-log row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeSetId {
    pub id: String,
    pub author: String,
    pub filename: String,
}

impl ChangeSetId {
    pub fn new(
        id: impl Into<String>,
        author: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            author: author.into(),
            filename: filename.into(),
        }
    }
}

impl fmt::Display for ChangeSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.filename, self.id, self.author)
    }
}

/// How a change set was executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecType {
    Executed,
    Failed,
    Skipped,
    Reran,
    MarkRan,
}

impl ExecType {
    /// Value stored in the `EXECTYPE` column
    pub fn as_str(self) -> &'static str {
        match self {
            ExecType::Executed => "EXECUTED",
            ExecType::Failed => "FAILED",
            ExecType::Skipped => "SKIPPED",
            ExecType::Reran => "RERAN",
            ExecType::MarkRan => "MARK_RAN",
        }
    }
}

impl fmt::Display for ExecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecType {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EXECUTED" => Ok(ExecType::Executed),
            "FAILED" => Ok(ExecType::Failed),
            "SKIPPED" => Ok(ExecType::Skipped),
            "RERAN" => Ok(ExecType::Reran),
            "MARK_RAN" => Ok(ExecType::MarkRan),
            _ => Err(CoreError::InvalidExecType(s.to_string())),
        }
    }
}

/// Versioned change-set check-sum, stored as `<version>:<hex digest>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CheckSum {
    version: u8,
    digest: String,
}

impl CheckSum {
    /// Build a check-sum from its parts, validating the stored form.
    pub fn new(version: u8, digest: impl Into<String>) -> CoreResult<Self> {
        let digest = digest.into();
        let value = format!("{version}:{digest}");
        if version == 0 {
            return Err(invalid_checksum(&value, "version must be positive"));
        }
        if digest.is_empty() {
            return Err(invalid_checksum(&value, "digest is empty"));
        }
        if !digest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid_checksum(&value, "digest must be hexadecimal"));
        }
        if value.len() > CHECKSUM_MAX_LEN {
            return Err(invalid_checksum(
                &value,
                &format!("longer than {CHECKSUM_MAX_LEN} characters"),
            ));
        }
        Ok(Self {
            version,
            digest: digest.to_ascii_lowercase(),
        })
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }
}

fn invalid_checksum(value: &str, reason: &str) -> CoreError {
    CoreError::InvalidCheckSum {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

impl FromStr for CheckSum {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let Some((version, digest)) = s.trim().split_once(':') else {
            return Err(invalid_checksum(s, "expected '<version>:<digest>'"));
        };
        let version = version
            .parse::<u8>()
            .map_err(|_| invalid_checksum(s, "version is not a number"))?;
        CheckSum::new(version, digest)
    }
}

impl fmt::Display for CheckSum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.version, self.digest)
    }
}

/// One row of the change-log table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeLogEntry {
    pub change_set: ChangeSetId,
    pub date_executed: Option<NaiveDateTime>,
    pub order_executed: Option<i64>,
    pub exec_type: Option<ExecType>,
    pub checksum: Option<CheckSum>,
    pub description: Option<String>,
    pub comments: Option<String>,
    pub tag: Option<String>,
    /// Tool version that applied the change set (`LIQUIBASE` column)
    pub version_label: Option<String>,
    pub contexts: Option<String>,
    pub labels: Option<String>,
    pub deployment_id: Option<String>,
}

impl ChangeLogEntry {
    /// Whether this row carries a tag
    pub fn is_tagged(&self) -> bool {
        self.tag.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// The single row of the change-log lock table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockRow {
    pub id: i32,
    pub locked: bool,
    pub granted: Option<NaiveDateTime>,
    pub locked_by: Option<String>,
}

#[cfg(test)]
#[path = "changelog_test.rs"]
mod tests;
