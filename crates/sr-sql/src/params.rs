//! StarRocks table parameters
//!
//! Renders the clause that follows the column list of a StarRocks
//! `CREATE TABLE`: engine, key description, and `PROPERTIES`.

use indexmap::IndexMap;

/// Parameters rendered after a StarRocks column list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableParams {
    /// Storage engine, e.g. `OLAP`
    pub engine: Option<String>,

    /// Primary-key column list, e.g. `ID, AUTHOR, FILENAME`
    pub key_desc: Option<String>,

    /// Table properties, rendered in insertion order
    pub properties: IndexMap<String, String>,
}

impl TableParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = Some(engine.into());
        self
    }

    pub fn primary_key(mut self, key_desc: impl Into<String>) -> Self {
        self.key_desc = Some(key_desc.into());
        self
    }

    pub fn properties(mut self, properties: IndexMap<String, String>) -> Self {
        self.properties = properties;
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Render the suffix clause.
    ///
    /// Each clause is emitted only when its input is present, always in
    /// the order ENGINE, PRIMARY KEY, PROPERTIES. Property keys and values
    /// are wrapped in double quotes verbatim and must not contain `"`.
    pub fn generate_sql(&self) -> String {
        let mut sql = String::new();

        if let Some(engine) = &self.engine {
            sql.push_str(&format!(" ENGINE = {engine}"));
        }

        if let Some(key_desc) = &self.key_desc {
            sql.push_str(&format!(" PRIMARY KEY ({key_desc})"));
        }

        if !self.properties.is_empty() {
            let rendered: Vec<String> = self
                .properties
                .iter()
                .map(|(key, value)| format!("\"{key}\"=\"{value}\""))
                .collect();
            sql.push_str(&format!(" PROPERTIES ({})", rendered.join(", ")));
        }

        sql
    }
}
