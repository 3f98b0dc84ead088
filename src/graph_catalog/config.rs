//! Relationship registry configuration.
//!
//! Registries can be described in YAML instead of being built in code:
//!
//! ```yaml
//! table_prefix: wp_          # Prepended to post_to_post / post_to_user
//! relationships:
//!   - kind: post_to_post     # Stored in <prefix>post_to_post (id1, id2)
//!     from: post
//!     to: car
//!     type: tire
//!   - kind: post_to_user     # Stored in <prefix>post_to_user (post_id, user_id)
//!     from: post
//!     type: owner
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use relquery::graph_catalog::config::RegistryConfig;
//!
//! let registry = RegistryConfig::from_yaml_file("relationships.yaml")?.to_registry()?;
//! ```

use super::errors::RegistryError;
use super::graph_schema::{RelationshipKind, RelationshipRegistry};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Prefix for relationship storage tables. Falls back to the caller's
    /// default when absent.
    #[serde(default)]
    pub table_prefix: Option<String>,
    #[serde(default)]
    pub relationships: Vec<RelationshipDefinition>,
}

pub const DEFAULT_TABLE_PREFIX: &str = "wp_";

/// One relationship in the registry config
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelationshipDefinition {
    pub kind: RelationshipKind,
    /// Post kind on the owning side
    pub from: String,
    /// Related post kind. Required for post_to_post, ignored for post_to_user.
    #[serde(default)]
    pub to: Option<String>,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl RegistryConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RegistryError> {
        serde_yaml::from_str(yaml).map_err(|e| RegistryError::ConfigParseError {
            error: e.to_string(),
        })
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| RegistryError::ConfigReadError {
            error: format!("{}: {}", path.display(), e),
        })?;
        Self::from_yaml_str(&content)
    }

    /// Build a registry, defining relationships in file order.
    pub fn to_registry(&self) -> Result<RelationshipRegistry, RegistryError> {
        self.to_registry_with_default_prefix(DEFAULT_TABLE_PREFIX)
    }

    pub fn to_registry_with_default_prefix(
        &self,
        default_prefix: &str,
    ) -> Result<RelationshipRegistry, RegistryError> {
        let prefix = self.table_prefix.as_deref().unwrap_or(default_prefix);
        let mut registry = RelationshipRegistry::new(prefix)?;

        for (idx, def) in self.relationships.iter().enumerate() {
            match def.kind {
                RelationshipKind::PostToPost => {
                    let to = def.to.as_deref().ok_or_else(|| RegistryError::InvalidConfig {
                        message: format!(
                            "relationship #{} ('{}') is post_to_post but has no `to` kind",
                            idx + 1,
                            def.type_name
                        ),
                    })?;
                    registry.define_post_to_post(&def.from, to, &def.type_name)?;
                }
                RelationshipKind::PostToUser => {
                    if def.to.is_some() {
                        log::warn!(
                            "Ignoring `to` on post_to_user relationship '{}'",
                            def.type_name
                        );
                    }
                    registry.define_post_to_user(&def.from, &def.type_name)?;
                }
            }
        }

        log::info!(
            "Loaded {} relationship(s) with table prefix '{}'",
            registry.relationship_count(),
            registry.table_prefix()
        );
        Ok(registry)
    }
}
