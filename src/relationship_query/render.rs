//! JOIN / WHERE fragment rendering.
//!
//! Both fragments are built from the same resolved list, so alias `p2pN`
//! in the WHERE text always refers to the N-th join.

use super::resolver::{ResolvedSegment, SqlLiteral};
use super::specification::Relation;
use super::QueryContext;

pub trait ToSql {
    fn to_sql(&self) -> String;
}

/// Quote text as a SQL string literal (MySQL escaping rules).
pub fn quote_text(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "''"))
}

impl ToSql for SqlLiteral {
    fn to_sql(&self) -> String {
        match self {
            SqlLiteral::Number(n) => n.clone(),
            SqlLiteral::Text(s) => quote_text(s),
            SqlLiteral::Null => "NULL".to_string(),
        }
    }
}

/// `inner join <table> as p2pN on <base_table>.<base_key> = p2pN.<base_column>`
pub struct RelationshipJoin<'a> {
    pub segment: &'a ResolvedSegment,
    pub context: &'a QueryContext,
}

impl ToSql for RelationshipJoin<'_> {
    fn to_sql(&self) -> String {
        let alias = self.segment.alias();
        format!(
            "inner join {} as {} on {}.{} = {}.{}",
            self.segment.table_name,
            alias,
            self.context.base_table,
            self.context.base_key,
            alias,
            self.segment.base_column
        )
    }
}

/// `(p2pN.<target_column> = <value> and p2pN.type = '<type>')`
pub struct SegmentPredicate<'a>(pub &'a ResolvedSegment);

impl ToSql for SegmentPredicate<'_> {
    fn to_sql(&self) -> String {
        let alias = self.0.alias();
        format!(
            "({}.{} = {} and {}.type = {})",
            alias,
            self.0.target_column,
            self.0.target_value.to_sql(),
            alias,
            quote_text(&self.0.type_name)
        )
    }
}

/// Each join is preceded by a single space; empty when nothing resolved.
pub fn render_join_fragment(resolved: &[ResolvedSegment], context: &QueryContext) -> String {
    resolved
        .iter()
        .map(|segment| format!(" {}", RelationshipJoin { segment, context }.to_sql()))
        .collect()
}

/// ` and ((pred1) OP (pred2) ...)`, ready to append to an existing WHERE.
/// Empty when nothing resolved.
pub fn render_where_fragment(resolved: &[ResolvedSegment], relation: Relation) -> String {
    if resolved.is_empty() {
        return String::new();
    }

    let separator = format!(" {} ", relation);
    let predicates: Vec<String> = resolved
        .iter()
        .map(|segment| SegmentPredicate(segment).to_sql())
        .collect();

    format!(" and ({})", predicates.join(&separator))
}
