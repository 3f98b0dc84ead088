//! SQL identifier checks shared by the registry and the compiler config.
//!
//! Table names, column names and the table prefix are spliced into SQL text
//! unquoted, so they are restricted to plain identifiers.

use regex::Regex;

use super::errors::RegistryError;

lazy_static::lazy_static! {
    static ref SQL_IDENTIFIER: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid");
    static ref TABLE_PREFIX: Regex =
        Regex::new(r"^[A-Za-z0-9_]*$").expect("prefix pattern is valid");
}

/// True if `value` can be spliced into SQL as a bare identifier.
pub fn is_sql_identifier(value: &str) -> bool {
    SQL_IDENTIFIER.is_match(value)
}

/// True if `value` can prefix an identifier. Empty is allowed.
pub fn is_table_prefix(value: &str) -> bool {
    TABLE_PREFIX.is_match(value)
}

pub fn validate_table_prefix(value: &str) -> Result<(), RegistryError> {
    if is_table_prefix(value) {
        Ok(())
    } else {
        Err(RegistryError::InvalidIdentifier {
            field: "table_prefix".to_string(),
            value: value.to_string(),
        })
    }
}
