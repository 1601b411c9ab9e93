//! Decoding of text rows into typed values

use chrono::NaiveDateTime;

use crate::error::{DbError, DbResult};

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Positional access to one text row with table context for errors
pub(crate) struct RowReader<'a> {
    table: &'a str,
    cells: &'a [Option<String>],
}

impl<'a> RowReader<'a> {
    pub(crate) fn new(table: &'a str, cells: &'a [Option<String>]) -> Self {
        Self { table, cells }
    }

    pub(crate) fn invalid(&self, message: impl Into<String>) -> DbError {
        DbError::InvalidRow {
            table: self.table.to_string(),
            message: message.into(),
        }
    }

    /// Nullable text cell; a missing trailing column reads as NULL
    pub(crate) fn opt_str(&self, index: usize) -> Option<&'a str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }

    pub(crate) fn str(&self, index: usize, column: &str) -> DbResult<&'a str> {
        self.opt_str(index)
            .ok_or_else(|| self.invalid(format!("{column} is NULL")))
    }

    pub(crate) fn opt_string(&self, index: usize) -> Option<String> {
        self.opt_str(index).map(str::to_string)
    }

    pub(crate) fn opt_i64(&self, index: usize, column: &str) -> DbResult<Option<i64>> {
        self.opt_str(index)
            .map(|s| {
                s.trim()
                    .parse::<i64>()
                    .map_err(|_| self.invalid(format!("{column} is not an integer: '{s}'")))
            })
            .transpose()
    }

    /// Boolean flag stored as `TINYINT`, `BIT(1)`, or `true`/`false`
    pub(crate) fn bool(&self, index: usize, column: &str) -> DbResult<bool> {
        let raw = self.str(index, column)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "\u{1}" => Ok(true),
            "0" | "false" | "\u{0}" => Ok(false),
            _ => Err(self.invalid(format!("{column} is not a boolean: '{raw}'"))),
        }
    }

    pub(crate) fn opt_datetime(&self, index: usize, column: &str) -> DbResult<Option<NaiveDateTime>> {
        let Some(raw) = self.opt_str(index) else {
            return Ok(None);
        };
        DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw.trim(), fmt).ok())
            .map(Some)
            .ok_or_else(|| self.invalid(format!("{column} is not a datetime: '{raw}'")))
    }
}
