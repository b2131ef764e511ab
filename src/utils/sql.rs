//! Quoting helpers for generated SQL.
//!
//! All identifiers and string literals that reach a generated query go through
//! these functions. Identifiers are validated and double-quoted (BW object
//! names such as `/BIC/HREGION` carry slashes, so bare rendering is not an
//! option); string literals are escaped and single-quoted.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SqlIdentError {
    #[error("identifier cannot be empty")]
    Empty,
    #[error("identifier '{0}' contains a quote or control character")]
    InvalidCharacter(String),
}

/// Quote a single identifier for use in generated SQL.
pub fn quote_ident(ident: &str) -> Result<String, SqlIdentError> {
    if ident.is_empty() {
        return Err(SqlIdentError::Empty);
    }
    if ident.chars().any(|c| c == '"' || c == '`' || c.is_control()) {
        return Err(SqlIdentError::InvalidCharacter(ident.to_string()));
    }
    Ok(format!("\"{}\"", ident))
}

/// Quote a schema-qualified table reference.
pub fn qualified(schema: &str, table: &str) -> Result<String, SqlIdentError> {
    Ok(format!("{}.{}", quote_ident(schema)?, quote_ident(table)?))
}

/// Escape and single-quote a string literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''"))
}

/// Collapse a pretty-printed query to one line for execution. The pretty form
/// is what goes into the audit side file.
pub fn single_line(sql: &str) -> String {
    sql.replace('\n', " ").replace('\t', " ")
}
