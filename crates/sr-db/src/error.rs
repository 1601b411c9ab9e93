//! Error types for sr-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Table not found (D003)
    #[error("[D003] Table not found: {0}")]
    TableNotFound(String),

    /// Query attempted against an offline database (D004)
    #[error("[D004] Cannot query in offline mode: {0}")]
    Offline(String),

    /// Row could not be decoded (D005)
    #[error("[D005] Invalid row from {table}: {message}")]
    InvalidRow { table: String, message: String },

    /// No dialect recognised the connection (D006)
    #[error("[D006] Unsupported database: {0}")]
    UnsupportedDatabase(String),

    /// Internal error (D007)
    #[error("[D007] Internal database error: {0}")]
    Internal(String),

    /// D008: SQL generation error propagation
    #[error("[D008] SQL generation error: {0}")]
    Sql(#[from] sr_sql::SqlError),

    /// D009: Core error propagation
    #[error("[D009] Core error: {0}")]
    Core(#[from] sr_core::CoreError),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// Whether this error means the queried table is absent
    pub fn is_table_not_found(&self) -> bool {
        matches!(self, DbError::TableNotFound(_))
    }
}

/// Change-log lock errors
#[derive(Error, Debug)]
pub enum LockError {
    /// L001: A table believed to exist could not be queried
    #[error("[L001] Unexpected failure reading lock table {table}: {source}")]
    Unexpected {
        table: String,
        #[source]
        source: DbError,
    },

    /// L002: Database error propagation
    #[error("[L002] Lock database error: {0}")]
    Db(#[from] DbError),
}

/// Result type alias for LockError
pub type LockResult<T> = Result<T, LockError>;

impl From<sr_sql::SqlError> for LockError {
    fn from(err: sr_sql::SqlError) -> Self {
        LockError::Db(err.into())
    }
}
