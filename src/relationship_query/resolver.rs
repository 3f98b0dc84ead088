use serde::Serialize;
use serde_json::Value;

use super::segment::Segment;
use crate::graph_catalog::graph_schema::RelationshipLookup;

/// Prefix of the table alias given to each joined relationship table
pub const ALIAS_PREFIX: &str = "p2p";

/// A value spliced into generated SQL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum SqlLiteral {
    /// Rendered bare
    Number(String),
    /// Rendered single-quoted
    Text(String),
    Null,
}

impl SqlLiteral {
    /// Numbers and integer-looking strings (`"25"`) render bare so ids
    /// compare numerically. Everything else becomes quoted text.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => SqlLiteral::Number(n.to_string()),
            Value::String(s) => match parse_integer(s) {
                Some(n) => SqlLiteral::Number(n),
                None => SqlLiteral::Text(s.clone()),
            },
            Value::Bool(b) => SqlLiteral::Number(if *b { "1" } else { "0" }.to_string()),
            Value::Null => SqlLiteral::Null,
            other => SqlLiteral::Text(other.to_string()),
        }
    }
}

fn parse_integer(text: &str) -> Option<String> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(n.to_string());
    }
    text.parse::<u64>().ok().map(|n| n.to_string())
}

/// A valid segment whose type is registered, with its assigned alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSegment {
    /// 1-based position among resolved segments
    pub alias_index: usize,
    pub type_name: String,
    pub table_name: String,
    pub base_column: String,
    pub target_column: String,
    pub target_value: SqlLiteral,
}

impl ResolvedSegment {
    pub fn alias(&self) -> String {
        format!("{}{}", ALIAS_PREFIX, self.alias_index)
    }
}

/// Resolve every valid segment against the registry, in order.
///
/// Invalid segments are skipped without a lookup. Valid segments whose
/// type is not registered for (`base_kind`, target kind) are dropped. Neither
/// case consumes an alias index.
pub fn resolve_segments<L>(segments: &[Segment], lookup: &L, base_kind: &str) -> Vec<ResolvedSegment>
where
    L: RelationshipLookup + ?Sized,
{
    let mut resolved = Vec::new();

    for (position, segment) in segments.iter().enumerate() {
        let Some(constraint) = segment.constraint() else {
            log::debug!("Skipping structurally invalid segment #{}", position + 1);
            continue;
        };
        let Some(type_name) = constraint.type_name() else {
            log::debug!(
                "Skipping segment #{}: type {} cannot name a relationship",
                position + 1,
                constraint.type_value
            );
            continue;
        };

        let target_kind = constraint.target.kind_name();
        match lookup.lookup(base_kind, target_kind, &type_name) {
            Some(columns) => {
                resolved.push(ResolvedSegment {
                    alias_index: resolved.len() + 1,
                    type_name,
                    table_name: columns.table_name,
                    base_column: columns.base_column,
                    target_column: columns.target_column,
                    target_value: SqlLiteral::from_value(constraint.target_id),
                });
            }
            None => {
                log::debug!(
                    "Dropping segment #{}: relationship '{}' not registered for {} -> {}",
                    position + 1,
                    type_name,
                    base_kind,
                    target_kind
                );
            }
        }
    }

    resolved
}
