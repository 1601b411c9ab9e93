//! Column type mapping
//!
//! Logical column types are mapped to physical type names by a
//! priority-ordered list of mappings. Dialect-specific mappings register
//! at [`PRIORITY_DATABASE`] and are consulted before the generic ones.

use std::cmp::Reverse;
use std::fmt;
use std::sync::OnceLock;

use sr_core::{DialectTag, PRIORITY_DATABASE, PRIORITY_DEFAULT};

use crate::error::{SqlError, SqlResult};

/// Dialect-independent column type request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    /// 32-bit integer, optionally with a display width (`INT(11)`)
    Int { display_width: Option<u32> },
    BigInt,
    TinyInt,
    Varchar(u32),
    DateTime,
    Boolean,
}

impl LogicalType {
    pub fn int() -> Self {
        LogicalType::Int {
            display_width: None,
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalType::Int {
                display_width: Some(w),
            } => write!(f, "int({w})"),
            LogicalType::Int { display_width: None } => f.write_str("int"),
            LogicalType::BigInt => f.write_str("bigint"),
            LogicalType::TinyInt => f.write_str("tinyint"),
            LogicalType::Varchar(n) => write!(f, "varchar({n})"),
            LogicalType::DateTime => f.write_str("datetime"),
            LogicalType::Boolean => f.write_str("boolean"),
        }
    }
}

/// Physical type name emitted in DDL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseDataType {
    name: String,
}

impl DatabaseDataType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for DatabaseDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One entry in the type registry
#[derive(Clone, Copy)]
pub struct TypeMapping {
    pub name: &'static str,
    /// `None` applies to every dialect
    pub dialect: Option<DialectTag>,
    pub priority: i32,
    pub handles: fn(&LogicalType) -> bool,
    pub map: fn(&LogicalType) -> DatabaseDataType,
}

impl TypeMapping {
    pub fn supports(&self, logical: &LogicalType, dialect: DialectTag) -> bool {
        self.dialect.map_or(true, |d| d == dialect) && (self.handles)(logical)
    }
}

impl fmt::Debug for TypeMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMapping")
            .field("name", &self.name)
            .field("dialect", &self.dialect)
            .field("priority", &self.priority)
            .finish()
    }
}

/// Priority-ordered type mappings
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    mappings: Vec<TypeMapping>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generic MySQL mappings only
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for mapping in STANDARD_MAPPINGS {
            registry.register(mapping);
        }
        registry
    }

    /// Generic mappings plus the StarRocks overrides
    pub fn with_starrocks() -> Self {
        let mut registry = Self::standard();
        registry.register(STARROCKS_INT);
        registry
    }

    /// Shared registry with every built-in mapping
    pub fn builtin() -> &'static TypeRegistry {
        static BUILTIN: OnceLock<TypeRegistry> = OnceLock::new();
        BUILTIN.get_or_init(TypeRegistry::with_starrocks)
    }

    /// Add a mapping; higher priorities are consulted first, ties keep
    /// registration order.
    pub fn register(&mut self, mapping: TypeMapping) {
        self.mappings.push(mapping);
        self.mappings.sort_by_key(|m| Reverse(m.priority));
    }

    /// Map `logical` to the physical type for `dialect`
    pub fn to_database_type(
        &self,
        logical: &LogicalType,
        dialect: DialectTag,
    ) -> SqlResult<DatabaseDataType> {
        self.mappings
            .iter()
            .find(|m| m.supports(logical, dialect))
            .map(|m| (m.map)(logical))
            .ok_or_else(|| SqlError::NoTypeMapping {
                logical: logical.to_string(),
                dialect,
            })
    }
}

fn is_int(logical: &LogicalType) -> bool {
    matches!(logical, LogicalType::Int { .. })
}

/// StarRocks accepts no display width on INT
pub const STARROCKS_INT: TypeMapping = TypeMapping {
    name: "starrocks_int",
    dialect: Some(DialectTag::StarRocks),
    priority: PRIORITY_DATABASE,
    handles: is_int,
    map: |_| DatabaseDataType::new("INT"),
};

const STANDARD_MAPPINGS: [TypeMapping; 6] = [
    TypeMapping {
        name: "int",
        dialect: None,
        priority: PRIORITY_DEFAULT,
        handles: is_int,
        map: |logical| match logical {
            LogicalType::Int {
                display_width: Some(w),
            } => DatabaseDataType::new(format!("INT({w})")),
            _ => DatabaseDataType::new("INT"),
        },
    },
    TypeMapping {
        name: "bigint",
        dialect: None,
        priority: PRIORITY_DEFAULT,
        handles: |l| matches!(l, LogicalType::BigInt),
        map: |_| DatabaseDataType::new("BIGINT"),
    },
    TypeMapping {
        name: "tinyint",
        dialect: None,
        priority: PRIORITY_DEFAULT,
        handles: |l| matches!(l, LogicalType::TinyInt),
        map: |_| DatabaseDataType::new("TINYINT"),
    },
    TypeMapping {
        name: "varchar",
        dialect: None,
        priority: PRIORITY_DEFAULT,
        handles: |l| matches!(l, LogicalType::Varchar(_)),
        map: |logical| match logical {
            LogicalType::Varchar(n) => DatabaseDataType::new(format!("VARCHAR({n})")),
            _ => DatabaseDataType::new("VARCHAR(255)"),
        },
    },
    TypeMapping {
        name: "datetime",
        dialect: None,
        priority: PRIORITY_DEFAULT,
        handles: |l| matches!(l, LogicalType::DateTime),
        map: |_| DatabaseDataType::new("DATETIME"),
    },
    TypeMapping {
        name: "boolean",
        dialect: None,
        priority: PRIORITY_DEFAULT,
        handles: |l| matches!(l, LogicalType::Boolean),
        map: |_| DatabaseDataType::new("BIT(1)"),
    },
];

#[cfg(test)]
#[path = "datatype_test.rs"]
mod tests;
