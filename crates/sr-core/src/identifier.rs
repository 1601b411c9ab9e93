//! Schema and table identifiers used in generated SQL.

use crate::newtype_string::define_identifier;

define_identifier! {
    /// Name of the schema (database) holding the change-log tables.
    pub struct SchemaName("schema", is_schema_char, "must not contain control characters");
}

define_identifier! {
    /// Name of a change-log or lock table. Rendered unquoted, so limited
    /// to ASCII letters, digits and underscores.
    pub struct TableName(
        "table",
        is_bare_identifier_char,
        "may only contain ASCII letters, digits and underscores"
    );
}

fn is_schema_char(c: char) -> bool {
    !c.is_control()
}

fn is_bare_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
