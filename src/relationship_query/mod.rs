//! Related-object filter compiler.
//!
//! Turns a loosely structured specification such as
//!
//! ```json
//! { "type": "basic", "related_to_post": 25,
//!   "0": { "type": "owner", "related_to_user": 2 },
//!   "relation": "OR" }
//! ```
//!
//! into a JOIN fragment and a WHERE fragment that an enclosing posts query
//! can append to its own clauses:
//!
//! ```text
//!  inner join wp_post_to_post as p2p1 on wp_posts.ID = p2p1.id1 inner join wp_post_to_user as p2p2 on wp_posts.ID = p2p2.post_id
//!  and ((p2p1.id2 = 25 and p2p1.type = 'basic') OR (p2p2.user_id = 2 and p2p2.type = 'owner'))
//! ```
//!
//! Pipeline: normalize → validate → resolve against the registry → render.
//! All of it runs inside [`RelationshipQuery::new`].
//!
//! ## Filtering policy
//!
//! Compilation never fails. Structurally invalid segments and segments whose
//! type is not registered are left out of both fragments, and the remaining
//! segments keep contiguous aliases. If nothing survives, both fragments are
//! empty strings, meaning "no extra filtering". Callers that need strict
//! behavior can call [`RelationshipQuery::check_resolved`] afterwards.

pub mod errors;
pub mod render;
pub mod resolver;
pub mod segment;
pub mod specification;

use serde::{Deserialize, Serialize};

use crate::graph_catalog::errors::RegistryError;
use crate::graph_catalog::graph_schema::{RelationshipLookup, POST_KIND};

pub use errors::SpecificationError;
pub use resolver::{ResolvedSegment, SqlLiteral};
pub use segment::{Segment, TargetKind};
pub use specification::{RawSpecification, Relation, SpecEntry};

/// The enclosing query's object kind and the table/key its rows come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryContext {
    /// Object kind of the rows being filtered, used for registry lookups
    pub base_kind: String,
    pub base_table: String,
    /// Id column of `base_table`
    pub base_key: String,
}

impl Default for QueryContext {
    fn default() -> Self {
        QueryContext {
            base_kind: POST_KIND.to_string(),
            base_table: "wp_posts".to_string(),
            base_key: "ID".to_string(),
        }
    }
}

/// The two compiled fragments, for callers that want them as one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledFragments {
    pub relation: Relation,
    pub join: String,
    #[serde(rename = "where")]
    pub where_clause: String,
}

/// A compiled related-object filter. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct RelationshipQuery {
    relation: Relation,
    segments: Vec<Segment>,
    resolved: Vec<ResolvedSegment>,
    join: String,
    where_clause: String,
}

impl RelationshipQuery {
    /// Compile `spec` against `registry` for rows described by `context`.
    ///
    /// The registry is consulted once per structurally valid segment.
    pub fn new<L>(spec: RawSpecification, registry: &L, context: &QueryContext) -> Self
    where
        L: RelationshipLookup + ?Sized,
    {
        let specification::NormalizedSpecification { relation, segments } =
            specification::normalize(spec);

        let resolved = if segment::has_valid_segments(&segments) {
            resolver::resolve_segments(&segments, registry, &context.base_kind)
        } else {
            Vec::new()
        };

        let join = render::render_join_fragment(&resolved, context);
        let where_clause = render::render_where_fragment(&resolved, relation);

        log::debug!(
            "Compiled relationship query: {} segment(s), {} resolved, relation {}",
            segments.len(),
            resolved.len(),
            relation
        );
        log::trace!("join:{}", join);
        log::trace!("where:{}", where_clause);

        RelationshipQuery {
            relation,
            segments,
            resolved,
            join,
            where_clause,
        }
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    /// Normalized segments, before validation
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_valid_segment(&self, segment: &Segment) -> bool {
        segment.is_valid()
    }

    pub fn has_valid_segments(&self) -> bool {
        segment::has_valid_segments(&self.segments)
    }

    /// Segments that made it into the fragments, in alias order
    pub fn resolved_segments(&self) -> &[ResolvedSegment] {
        &self.resolved
    }

    pub fn join_fragment(&self) -> &str {
        &self.join
    }

    pub fn where_fragment(&self) -> &str {
        &self.where_clause
    }

    /// Fail on the first structurally valid segment whose type is not
    /// registered. Invalid segments are skipped. The error context names the
    /// segment by its 1-based position in [`RelationshipQuery::segments`].
    pub fn check_resolved<L>(&self, registry: &L, context: &QueryContext) -> Result<(), RegistryError>
    where
        L: RelationshipLookup + ?Sized,
    {
        for (idx, segment) in self.segments.iter().enumerate() {
            let Some(constraint) = segment.constraint() else {
                continue;
            };
            let target_kind = constraint.target.kind_name();
            let resolved = constraint
                .type_name()
                .and_then(|type_name| registry.lookup(&context.base_kind, target_kind, &type_name));
            if resolved.is_none() {
                let type_name = constraint
                    .type_name()
                    .unwrap_or_else(|| constraint.type_value.to_string());
                return Err(RegistryError::relationship_error_with_context(
                    type_name,
                    context.base_kind.clone(),
                    target_kind,
                    format!("segment #{} of the specification", idx + 1),
                ));
            }
        }
        Ok(())
    }

    pub fn fragments(&self) -> CompiledFragments {
        CompiledFragments {
            relation: self.relation,
            join: self.join.clone(),
            where_clause: self.where_clause.clone(),
        }
    }
}
