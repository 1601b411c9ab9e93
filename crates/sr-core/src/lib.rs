//! sr-core - Core library for starrocks-migrate
//!
//! This crate provides the StarRocks dialect descriptor and detection
//! predicate, configuration parsing, the change-log and lock row models,
//! and the quoting helpers shared by the SQL generators.

pub mod changelog;
pub mod config;
pub mod context;
pub mod dialect;
pub mod error;
pub mod host;
pub mod identifier;
mod newtype_string;
pub mod sql_utils;

pub use changelog::{ChangeLogEntry, ChangeSetId, CheckSum, ExecType, LockRow};
pub use config::{Config, DatabaseConfig};
pub use context::ChangeLogContext;
pub use dialect::{
    detect_dialect, DatabaseConnection, Dialect, DialectTag, MySqlDialect, StarRocksDialect,
    PRIORITY_DATABASE, PRIORITY_DEFAULT,
};
pub use error::{CoreError, CoreResult};
pub use host::HostIdentity;
pub use identifier::{SchemaName, TableName};
