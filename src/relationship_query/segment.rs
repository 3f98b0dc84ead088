//! Relationship constraint segments and their structural validation.
//!
//! A segment is valid when it names a `type` and exactly one of
//! `related_to_post` / `related_to_user`. Only key presence is checked: an
//! id of `0`, `""` or `null` still counts, and both keys present is invalid
//! whatever their values.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::graph_catalog::graph_schema::{POST_KIND, USER_KIND};

pub const TYPE_KEY: &str = "type";
pub const RELATED_TO_POST_KEY: &str = "related_to_post";
pub const RELATED_TO_USER_KEY: &str = "related_to_user";

/// One relationship constraint as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Segment {
    /// Field name to value, in input order
    Keyed(Map<String, Value>),
    /// A bare list of values with no field names. Never valid.
    Positional(Vec<Value>),
}

/// Which kind of object a segment relates to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Post,
    User,
}

impl TargetKind {
    /// Object kind passed to the registry
    pub fn kind_name(&self) -> &'static str {
        match self {
            TargetKind::Post => POST_KIND,
            TargetKind::User => USER_KIND,
        }
    }
}

/// Borrowed view of a valid segment's constraint
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentConstraint<'a> {
    pub type_value: &'a Value,
    pub target: TargetKind,
    pub target_id: &'a Value,
}

impl<'a> SegmentConstraint<'a> {
    /// Relationship type as registry lookup text. Only strings and numbers
    /// can name a relationship.
    pub fn type_name(&self) -> Option<String> {
        match self.type_value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl Segment {
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Segment::Keyed(fields) => fields.get(key),
            Segment::Positional(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Segment::Keyed(fields) => fields.is_empty(),
            Segment::Positional(values) => values.is_empty(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.constraint().is_some()
    }

    /// The constraint this segment expresses, if it is structurally valid.
    pub fn constraint(&self) -> Option<SegmentConstraint<'_>> {
        let Segment::Keyed(fields) = self else {
            return None;
        };
        let type_value = fields.get(TYPE_KEY)?;

        let (target, target_id) = match (
            fields.get(RELATED_TO_POST_KEY),
            fields.get(RELATED_TO_USER_KEY),
        ) {
            (Some(id), None) => (TargetKind::Post, id),
            (None, Some(id)) => (TargetKind::User, id),
            _ => return None,
        };

        Some(SegmentConstraint {
            type_value,
            target,
            target_id,
        })
    }
}

impl From<Map<String, Value>> for Segment {
    fn from(fields: Map<String, Value>) -> Self {
        Segment::Keyed(fields)
    }
}

impl From<Value> for Segment {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Segment::Keyed(fields),
            Value::Array(values) => Segment::Positional(values),
            scalar => Segment::Positional(vec![scalar]),
        }
    }
}

/// True if at least one segment is structurally valid
pub fn has_valid_segments(segments: &[Segment]) -> bool {
    segments.iter().any(Segment::is_valid)
}
