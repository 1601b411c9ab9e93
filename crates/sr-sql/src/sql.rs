//! Generated SQL fragments

use std::fmt;

/// One SQL statement produced by a generator, executed verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sql {
    text: String,
    affected_table: Option<String>,
}

impl Sql {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            affected_table: None,
        }
    }

    /// A statement that reads or writes `table`
    pub fn affecting(text: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            affected_table: Some(table.into()),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn affected_table(&self) -> Option<&str> {
        self.affected_table.as_deref()
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for Sql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
