//! Error types for sr-sql

use sr_core::DialectTag;
use thiserror::Error;

use crate::statement::StatementKind;

/// SQL generation errors
#[derive(Error, Debug)]
pub enum SqlError {
    /// No registered generator supports the statement (S001)
    #[error("[S001] No SQL generator for {kind} on {dialect}")]
    NoGenerator {
        kind: StatementKind,
        dialect: DialectTag,
    },

    /// Generator invoked with a statement of another kind (S002)
    #[error("[S002] Generator for {expected} received a {found} statement")]
    StatementMismatch {
        expected: StatementKind,
        found: StatementKind,
    },

    /// No registered type mapping handles the logical type (S003)
    #[error("[S003] No type mapping for {logical} on {dialect}")]
    NoTypeMapping { logical: String, dialect: DialectTag },
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
