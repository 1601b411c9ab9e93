//! sr-db - Database layer for starrocks-migrate
//!
//! This crate provides the `Database` trait, a MySQL-wire implementation
//! for StarRocks front-ends, an offline backend that records SQL instead
//! of running it, and the lock and change-log services built on top of
//! the generator registry.

pub mod changelog;
pub mod connection;
pub mod error;
pub mod executor;
pub mod lock;
pub mod mysql;
pub mod offline;
mod row;
#[cfg(test)]
mod testing;
pub mod traits;

pub use changelog::ChangeLogService;
pub use connection::ConnectionInfo;
pub use error::{DbError, DbResult, LockError, LockResult};
pub use executor::Executor;
pub use lock::LockService;
pub use mysql::MySqlBackend;
pub use offline::OfflineDatabase;
pub use traits::{Database, Rows};
