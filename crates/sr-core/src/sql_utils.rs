//! SQL quoting utilities for the MySQL-family dialects
//!
//! Schema names are backtick-quoted, table names are emitted bare after a
//! `.` separator (`` `schema`.TABLE ``), and string literals are single-quoted
//! with MySQL escaping rules.

/// Quote an identifier with backticks, doubling any embedded backtick.
///
/// # Examples
/// ```
/// use sr_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("analytics"), "`analytics`");
/// assert_eq!(quote_ident("a`b"), "`a``b`");
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// Render a schema-qualified table reference as `` `schema`.table ``.
///
/// # Examples
/// ```
/// use sr_core::sql_utils::qualify_table;
/// assert_eq!(
///     qualify_table("analytics", "DATABASECHANGELOGLOCK"),
///     "`analytics`.DATABASECHANGELOGLOCK"
/// );
/// ```
pub fn qualify_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(schema), table)
}

/// Escape a value for use inside a single-quoted MySQL string literal.
///
/// Backslashes are escaped first so the doubled quotes are not
/// reinterpreted.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "''")
}

/// Render a value as a complete single-quoted string literal.
pub fn string_literal(value: &str) -> String {
    format!("'{}'", escape_sql_string(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident_simple() {
        assert_eq!(quote_ident("analytics"), "`analytics`");
    }

    #[test]
    fn test_quote_ident_with_embedded_backtick() {
        assert_eq!(quote_ident("my`schema"), "`my``schema`");
    }

    #[test]
    fn test_qualify_table() {
        assert_eq!(
            qualify_table("analytics", "DATABASECHANGELOG"),
            "`analytics`.DATABASECHANGELOG"
        );
    }

    #[test]
    fn test_escape_sql_string() {
        assert_eq!(escape_sql_string("hello"), "hello");
        assert_eq!(escape_sql_string("it's"), "it''s");
        assert_eq!(escape_sql_string(r"C:\path"), r"C:\\path");
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(string_literal("v1.0"), "'v1.0'");
        assert_eq!(string_literal("O'Brien"), "'O''Brien'");
    }
}
