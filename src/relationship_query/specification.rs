//! Raw filter specifications and their normalization into segments.
//!
//! A specification mixes three things at its top level:
//!
//! - a `relation` control key (matched case-insensitively),
//! - named fields that together form an implicit first segment,
//! - unnamed nested mappings or lists, each an explicit segment.
//!
//! ```json
//! { "type": "complex", "related_to_post": 25,
//!   "0": { "type": "basic", "related_to_post": 50 },
//!   "relation": "or" }
//! ```
//!
//! normalizes to relation `OR` with segments
//! `[{type: complex, related_to_post: 25}, {type: basic, related_to_post: 50}]`.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

use super::errors::SpecificationError;
use super::segment::Segment;

pub const RELATION_KEY: &str = "relation";

/// Logical combinator between segment predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Relation {
    #[default]
    And,
    Or,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::And => "AND",
            Relation::Or => "OR",
        }
    }

    /// Case-insensitive parse of a relation value. Anything other than
    /// `and`/`or` (in any casing) falls back to `AND`.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::from_text(s),
            _ => Relation::And,
        }
    }

    pub fn from_text(text: &str) -> Self {
        match text.to_ascii_uppercase().as_str() {
            "OR" => Relation::Or,
            _ => Relation::And,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True if `key` names the relation control key in any casing
pub fn is_relation_key(key: &str) -> bool {
    key.eq_ignore_ascii_case(RELATION_KEY)
}

/// One top-level entry of a specification
#[derive(Debug, Clone, PartialEq)]
pub enum SpecEntry {
    /// A string-keyed entry: the relation key or an implicit-segment field
    Named { key: String, value: Value },
    /// An index-keyed entry, normally a nested segment
    Unnamed(Value),
}

/// Caller-supplied filter specification, consumed once by the compiler.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSpecification {
    entries: Vec<SpecEntry>,
}

impl RawSpecification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named top-level field
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.push(SpecEntry::Named {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Add an explicit nested segment
    pub fn segment(mut self, value: impl Into<Value>) -> Self {
        self.entries.push(SpecEntry::Unnamed(value.into()));
        self
    }

    pub fn relation(self, value: impl Into<Value>) -> Self {
        self.field(RELATION_KEY, value)
    }

    pub fn entries(&self) -> &[SpecEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_json_str(text: &str) -> Result<Self, SpecificationError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| SpecificationError::InvalidJson(e.to_string()))?;
        Self::try_from(value)
    }
}

fn is_index_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl TryFrom<Value> for RawSpecification {
    type Error = SpecificationError;

    /// Objects keep key order. Integer-like keys holding an object or array
    /// are nested segments; every other key is a named field. In a top-level
    /// array every container element is a nested segment and scalars are
    /// named by their index.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let entries = match value {
            Value::Object(map) => map
                .into_iter()
                .map(|(key, value)| {
                    if is_index_key(&key) && is_container(&value) {
                        SpecEntry::Unnamed(value)
                    } else {
                        SpecEntry::Named { key, value }
                    }
                })
                .collect(),
            Value::Array(values) => values
                .into_iter()
                .enumerate()
                .map(|(idx, value)| {
                    if is_container(&value) {
                        SpecEntry::Unnamed(value)
                    } else {
                        SpecEntry::Named {
                            key: idx.to_string(),
                            value,
                        }
                    }
                })
                .collect(),
            other => {
                return Err(SpecificationError::UnsupportedTopLevel {
                    found: json_type_name(&other),
                })
            }
        };
        Ok(RawSpecification { entries })
    }
}

/// First index key at or after `position` not used by a named field or an
/// earlier unnamed scalar
fn free_index_key(position: usize, named: &HashSet<String>, implicit: &Map<String, Value>) -> String {
    (position..)
        .map(|idx| idx.to_string())
        .find(|key| !named.contains(key) && !implicit.contains_key(key))
        .unwrap_or_default()
}

/// Output of [`normalize`]
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSpecification {
    pub relation: Relation,
    pub segments: Vec<Segment>,
}

/// Split a specification into its relation and ordered segment list.
///
/// The implicit segment built from named fields is placed first, and only
/// exists if at least one such field was given. Values pass through as-is.
pub fn normalize(spec: RawSpecification) -> NormalizedSpecification {
    let mut relation = Relation::And;
    let mut implicit = Map::new();
    let mut explicit = Vec::new();

    let named_keys: HashSet<String> = spec
        .entries
        .iter()
        .filter_map(|entry| match entry {
            SpecEntry::Named { key, .. } if !is_relation_key(key) => Some(key.clone()),
            _ => None,
        })
        .collect();

    for (position, entry) in spec.entries.into_iter().enumerate() {
        match entry {
            // Last relation key wins
            SpecEntry::Named { key, value } if is_relation_key(&key) => {
                relation = Relation::from_value(&value);
            }
            SpecEntry::Named { key, value } => {
                implicit.insert(key, value);
            }
            SpecEntry::Unnamed(value) if is_container(&value) => {
                explicit.push(Segment::from(value));
            }
            SpecEntry::Unnamed(value) => {
                let key = free_index_key(position, &named_keys, &implicit);
                implicit.insert(key, value);
            }
        }
    }

    let mut segments = Vec::with_capacity(explicit.len() + 1);
    if !implicit.is_empty() {
        segments.push(Segment::Keyed(implicit));
    }
    segments.extend(explicit);

    log::trace!(
        "Normalized specification: relation={}, {} segment(s)",
        relation,
        segments.len()
    );

    NormalizedSpecification { relation, segments }
}
