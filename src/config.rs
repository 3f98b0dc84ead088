use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::{Validate, ValidationError};

use crate::graph_catalog::identifier::{is_sql_identifier, is_table_prefix};
use crate::relationship_query::QueryContext;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

fn validate_identifier(value: &str) -> Result<(), ValidationError> {
    if is_sql_identifier(value) {
        Ok(())
    } else {
        Err(ValidationError::new("sql_identifier"))
    }
}

fn validate_prefix(value: &str) -> Result<(), ValidationError> {
    if is_table_prefix(value) {
        Ok(())
    } else {
        Err(ValidationError::new("table_prefix"))
    }
}

/// Compiler configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompilerConfig {
    /// Object kind of the rows the enclosing query selects
    #[validate(length(min = 1, message = "Base kind cannot be empty"))]
    pub base_kind: String,

    /// Table the enclosing query selects from
    #[validate(custom(function = "validate_identifier", message = "Base table must be a plain SQL identifier"))]
    pub base_table: String,

    /// Id column of the base table
    #[validate(custom(function = "validate_identifier", message = "Base key must be a plain SQL identifier"))]
    pub base_key: String,

    /// Prefix for relationship tables
    #[validate(custom(function = "validate_prefix", message = "Table prefix may only contain letters, digits and underscores"))]
    pub table_prefix: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            base_kind: "post".to_string(),
            base_table: "wp_posts".to_string(),
            base_key: "ID".to_string(),
            table_prefix: "wp_".to_string(),
        }
    }
}

impl CompilerConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            base_kind: parse_env_var("RELQUERY_BASE_KIND", &defaults.base_kind)?,
            base_table: parse_env_var("RELQUERY_BASE_TABLE", &defaults.base_table)?,
            base_key: parse_env_var("RELQUERY_BASE_KEY", &defaults.base_key)?,
            table_prefix: parse_env_var("RELQUERY_TABLE_PREFIX", &defaults.table_prefix)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file. Missing fields take defaults.
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides (e.g. from the command line) and re-validate
    pub fn merge(&mut self, overrides: ConfigOverrides) -> Result<(), ConfigError> {
        if let Some(base_kind) = overrides.base_kind {
            self.base_kind = base_kind;
        }
        if let Some(base_table) = overrides.base_table {
            self.base_table = base_table;
        }
        if let Some(base_key) = overrides.base_key {
            self.base_key = base_key;
        }
        if let Some(table_prefix) = overrides.table_prefix {
            self.table_prefix = table_prefix;
        }
        self.validate()?;
        Ok(())
    }

    pub fn query_context(&self) -> QueryContext {
        QueryContext {
            base_kind: self.base_kind.clone(),
            base_table: self.base_table.clone(),
            base_key: self.base_key.clone(),
        }
    }
}

/// Optional per-field overrides (parsed from command line arguments)
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub base_kind: Option<String>,
    pub base_table: Option<String>,
    pub base_key: Option<String>,
    pub table_prefix: Option<String>,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
