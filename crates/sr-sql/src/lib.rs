//! sr-sql - SQL generation layer for starrocks-migrate
//!
//! This crate turns change-log and lock statements into SQL text. Each
//! statement kind has a priority-ordered list of generators; the
//! StarRocks overrides outrank the standard MySQL-flavoured generators
//! whenever the target dialect is StarRocks.

pub mod datatype;
pub mod error;
pub mod generator;
pub mod params;
pub mod sql;
pub mod standard;
pub mod starrocks;
pub mod statement;

pub use datatype::{DatabaseDataType, LogicalType, TypeMapping, TypeRegistry};
pub use error::{SqlError, SqlResult};
pub use generator::{Generator, GeneratorContext, GeneratorRegistry};
pub use params::TableParams;
pub use sql::Sql;
pub use statement::{Statement, StatementKind};
