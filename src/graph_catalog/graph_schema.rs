use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::errors::RegistryError;
use super::identifier::validate_table_prefix;

/// Object kind used as the target of `related_to_user` segments.
pub const USER_KIND: &str = "user";

/// Object kind used as the target of `related_to_post` segments.
pub const POST_KIND: &str = "post";

/// Storage shape of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    PostToPost,
    PostToUser,
}

impl RelationshipKind {
    /// Table name without the installation prefix
    pub fn table_suffix(&self) -> &'static str {
        match self {
            RelationshipKind::PostToPost => "post_to_post",
            RelationshipKind::PostToUser => "post_to_user",
        }
    }

    /// (base-side column, target-side column)
    pub fn columns(&self) -> (&'static str, &'static str) {
        match self {
            RelationshipKind::PostToPost => ("id1", "id2"),
            RelationshipKind::PostToUser => ("post_id", "user_id"),
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_suffix())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RelationshipSchema {
    pub kind: RelationshipKind,
    pub type_name: String,
    pub from_kind: String, // Object kind (e.g., "post")
    pub to_kind: String,   // Object kind (e.g., "car" or "user")
    pub table_name: String,
    pub from_id: String, // Column holding the current object's id (e.g., "id1")
    pub to_id: String,   // Column holding the related object's id (e.g., "id2")
}

impl RelationshipSchema {
    pub fn columns(&self) -> RelationshipColumns {
        RelationshipColumns {
            table_name: self.table_name.clone(),
            base_column: self.from_id.clone(),
            target_column: self.to_id.clone(),
        }
    }
}

/// Storage mapping returned by a successful lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipColumns {
    pub table_name: String,
    pub base_column: String,
    pub target_column: String,
}

/// Read-only view of a relationship catalog, as consumed by the query compiler.
///
/// Implementations must be deterministic for a fixed catalog state.
#[cfg_attr(test, mockall::automock)]
pub trait RelationshipLookup {
    fn lookup(
        &self,
        base_kind: &str,
        target_kind: &str,
        type_name: &str,
    ) -> Option<RelationshipColumns>;
}

impl<T: RelationshipLookup + ?Sized> RelationshipLookup for &T {
    fn lookup(
        &self,
        base_kind: &str,
        target_kind: &str,
        type_name: &str,
    ) -> Option<RelationshipColumns> {
        (**self).lookup(base_kind, target_kind, type_name)
    }
}

impl<T: RelationshipLookup + ?Sized> RelationshipLookup for Arc<T> {
    fn lookup(
        &self,
        base_kind: &str,
        target_kind: &str,
        type_name: &str,
    ) -> Option<RelationshipColumns> {
        (**self).lookup(base_kind, target_kind, type_name)
    }
}

/// Post-to-post pairs are stored with the kinds sorted so that a
/// relationship defined as (post, car) also matches (car, post).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct RelationshipKey {
    kind: RelationshipKind,
    first: String,
    second: String,
    type_name: String,
}

impl RelationshipKey {
    fn post_to_post(a: &str, b: &str, type_name: &str) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        RelationshipKey {
            kind: RelationshipKind::PostToPost,
            first: first.to_string(),
            second: second.to_string(),
            type_name: type_name.to_string(),
        }
    }

    fn post_to_user(post_kind: &str, type_name: &str) -> Self {
        RelationshipKey {
            kind: RelationshipKind::PostToUser,
            first: post_kind.to_string(),
            second: USER_KIND.to_string(),
            type_name: type_name.to_string(),
        }
    }

    fn for_lookup(base_kind: &str, target_kind: &str, type_name: &str) -> Self {
        if target_kind == USER_KIND {
            Self::post_to_user(base_kind, type_name)
        } else {
            Self::post_to_post(base_kind, target_kind, type_name)
        }
    }
}

/// Catalog of registered relationship types.
#[derive(Debug, Clone)]
pub struct RelationshipRegistry {
    table_prefix: String,
    relationships: BTreeMap<RelationshipKey, RelationshipSchema>,
}

impl Default for RelationshipRegistry {
    fn default() -> Self {
        RelationshipRegistry {
            table_prefix: "wp_".to_string(),
            relationships: BTreeMap::new(),
        }
    }
}

impl RelationshipRegistry {
    pub fn new(table_prefix: impl Into<String>) -> Result<Self, RegistryError> {
        let table_prefix = table_prefix.into();
        validate_table_prefix(&table_prefix)?;
        Ok(RelationshipRegistry {
            table_prefix,
            relationships: BTreeMap::new(),
        })
    }

    pub fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    /// Register a relationship between two post kinds.
    pub fn define_post_to_post(
        &mut self,
        from_kind: &str,
        to_kind: &str,
        type_name: &str,
    ) -> Result<&RelationshipSchema, RegistryError> {
        let key = RelationshipKey::post_to_post(from_kind, to_kind, type_name);
        self.insert(key, RelationshipKind::PostToPost, from_kind, to_kind, type_name)
    }

    /// Register a relationship between a post kind and users.
    pub fn define_post_to_user(
        &mut self,
        post_kind: &str,
        type_name: &str,
    ) -> Result<&RelationshipSchema, RegistryError> {
        let key = RelationshipKey::post_to_user(post_kind, type_name);
        self.insert(key, RelationshipKind::PostToUser, post_kind, USER_KIND, type_name)
    }

    fn insert(
        &mut self,
        key: RelationshipKey,
        kind: RelationshipKind,
        from_kind: &str,
        to_kind: &str,
        type_name: &str,
    ) -> Result<&RelationshipSchema, RegistryError> {
        if from_kind.is_empty() || to_kind.is_empty() || type_name.is_empty() {
            return Err(RegistryError::InvalidConfig {
                message: format!(
                    "relationship needs non-empty kinds and type (got from='{}', to='{}', type='{}')",
                    from_kind, to_kind, type_name
                ),
            });
        }
        if self.relationships.contains_key(&key) {
            return Err(RegistryError::DuplicateRelationship {
                from_kind: from_kind.to_string(),
                to_kind: to_kind.to_string(),
                type_name: type_name.to_string(),
            });
        }

        let (from_id, to_id) = kind.columns();
        let schema = RelationshipSchema {
            kind,
            type_name: type_name.to_string(),
            from_kind: from_kind.to_string(),
            to_kind: to_kind.to_string(),
            table_name: format!("{}{}", self.table_prefix, kind.table_suffix()),
            from_id: from_id.to_string(),
            to_id: to_id.to_string(),
        };
        log::debug!(
            "Registered {} relationship '{}' ({} -> {}) in {}",
            kind,
            type_name,
            from_kind,
            to_kind,
            schema.table_name
        );
        Ok(self.relationships.entry(key).or_insert(schema))
    }

    pub fn get_relationship(
        &self,
        base_kind: &str,
        target_kind: &str,
        type_name: &str,
    ) -> Result<&RelationshipSchema, RegistryError> {
        self.get_relationship_opt(base_kind, target_kind, type_name)
            .ok_or_else(|| RegistryError::Relationship {
                base_kind: base_kind.to_string(),
                target_kind: target_kind.to_string(),
                type_name: type_name.to_string(),
            })
    }

    pub fn get_relationship_opt(
        &self,
        base_kind: &str,
        target_kind: &str,
        type_name: &str,
    ) -> Option<&RelationshipSchema> {
        self.relationships
            .get(&RelationshipKey::for_lookup(base_kind, target_kind, type_name))
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    /// All registered relationships in a stable order
    pub fn relationships(&self) -> impl Iterator<Item = &RelationshipSchema> {
        self.relationships.values()
    }
}

impl RelationshipLookup for RelationshipRegistry {
    fn lookup(
        &self,
        base_kind: &str,
        target_kind: &str,
        type_name: &str,
    ) -> Option<RelationshipColumns> {
        self.get_relationship_opt(base_kind, target_kind, type_name)
            .map(RelationshipSchema::columns)
    }
}
