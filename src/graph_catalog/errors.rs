//! # Relationship Registry Error Types
//!
//! Errors raised while defining relationships or loading a registry from
//! configuration.
//!
//! ## Error Categories
//!
//! - **Definition Errors**: duplicate relationships, malformed identifiers
//! - **Lookup Errors**: strict lookups for a relationship that is not registered
//! - **Configuration Errors**: file I/O and parsing issues during registry loading
//!
//! Compilation itself never surfaces these. An unregistered type is dropped
//! from the compiled fragments, and only `RelationshipQuery::check_resolved`
//! reports it afterwards:
//!
//! ```ignore
//! RegistryError::relationship_error_with_context(
//!     "owner",
//!     "post",
//!     "user",
//!     "segment #2 of the specification"
//! )
//! ```

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegistryError {
    #[error("No relationship `{type_name}` registered between `{base_kind}` and `{target_kind}`.")]
    Relationship {
        base_kind: String,
        target_kind: String,
        type_name: String,
    },
    #[error("Relationship `{type_name}` between `{from_kind}` and `{to_kind}` is already defined")]
    DuplicateRelationship {
        from_kind: String,
        to_kind: String,
        type_name: String,
    },
    #[error("Invalid identifier '{value}' for {field}: expected letters, digits and underscores")]
    InvalidIdentifier { field: String, value: String },
    #[error("Failed to read registry configuration: {error}")]
    ConfigReadError { error: String },
    #[error("Failed to parse registry configuration: {error}")]
    ConfigParseError { error: String },
    #[error("Invalid registry configuration: {message}")]
    InvalidConfig { message: String },
}

impl RegistryError {
    /// Create a lookup error carrying operational context in the type name slot
    pub fn relationship_error_with_context(
        type_name: impl Into<String>,
        base_kind: impl Into<String>,
        target_kind: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        RegistryError::Relationship {
            base_kind: base_kind.into(),
            target_kind: target_kind.into(),
            type_name: format!("{}\n  Context: {}", type_name.into(), context.into()),
        }
    }
}
