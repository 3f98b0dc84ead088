//! Relation parsing, segment normalization and fragment generation through
//! the public `RelationshipQuery` API.

use relquery::graph_catalog::RelationshipRegistry;
use relquery::relationship_query::{
    QueryContext, RawSpecification, Relation, RelationshipQuery, Segment,
};
use serde_json::json;
use test_case::test_case;

fn compile(spec: RawSpecification, registry: &RelationshipRegistry) -> RelationshipQuery {
    RelationshipQuery::new(spec, registry, &QueryContext::default())
}

fn compile_unregistered(spec: RawSpecification) -> RelationshipQuery {
    compile(spec, &RelationshipRegistry::default())
}

/// post <-> post "basic" and "complex"
fn post_registry() -> RelationshipRegistry {
    let mut registry = RelationshipRegistry::default();
    registry
        .define_post_to_post("post", "post", "basic")
        .expect("define basic");
    registry
        .define_post_to_post("post", "post", "complex")
        .expect("define complex");
    registry
}

fn two_segments(second_type: &str, second_id: i64, relation: &str) -> RawSpecification {
    RawSpecification::new()
        .segment(json!({"type": "basic", "related_to_post": 2}))
        .segment(json!({"type": second_type, "related_to_post": second_id}))
        .relation(relation)
}

#[test]
fn test_relation_defaults_to_and() {
    assert_eq!(compile_unregistered(RawSpecification::new()).relation(), Relation::And);
}

#[test_case("relation", "AND", Relation::And ; "valid and")]
#[test_case("relation", "OR", Relation::Or ; "valid or")]
#[test_case("relation", "aNd", Relation::And ; "weird casing and")]
#[test_case("relation", "oR", Relation::Or ; "weird casing or")]
#[test_case("relationship", "any", Relation::And ; "wrong key")]
#[test_case("relationship", "", Relation::And ; "wrong key empty value")]
#[test_case("RELATION", "OR", Relation::Or ; "upper case key")]
fn test_relation_parsing(key: &str, value: &str, expected: Relation) {
    let query = compile_unregistered(RawSpecification::new().field(key, value));
    assert_eq!(query.relation(), expected);
    assert_eq!(query.relation().to_string(), expected.as_str());
}

#[test]
fn test_top_level_fields_become_one_segment() {
    let query = compile_unregistered(
        RawSpecification::new()
            .field("related_to_post", "25")
            .field("type", "basic"),
    );
    assert_eq!(
        query.segments(),
        &[Segment::from(json!({"related_to_post": "25", "type": "basic"}))]
    );

    let query = compile_unregistered(
        RawSpecification::new()
            .field("related_to_user", "1")
            .field("type", "owner"),
    );
    assert_eq!(
        query.segments(),
        &[Segment::from(json!({"related_to_user": "1", "type": "owner"}))]
    );
}

#[test]
fn test_top_level_fields_precede_nested_segments() {
    let query = compile_unregistered(
        RawSpecification::new()
            .field("related_to_post", "25")
            .field("type", "complex")
            .segment(json!({"related_to_post": "50", "type": "basic"})),
    );
    assert_eq!(
        query.segments(),
        &[
            Segment::from(json!({"related_to_post": "25", "type": "complex"})),
            Segment::from(json!({"related_to_post": "50", "type": "basic"})),
        ]
    );
}

#[test]
fn test_valid_segments_are_tracked() {
    assert!(!compile_unregistered(RawSpecification::new()).has_valid_segments());

    let implicit = RawSpecification::new()
        .field("type", "basic")
        .field("related_to_post", 25);
    assert!(compile_unregistered(implicit).has_valid_segments());

    let nested_post =
        RawSpecification::new().segment(json!({"type": "complex", "related_to_post": 25}));
    assert!(compile_unregistered(nested_post).has_valid_segments());

    let nested_user =
        RawSpecification::new().segment(json!({"related_to_user": 2, "type": "owner"}));
    assert!(compile_unregistered(nested_user).has_valid_segments());

    let valid_last = RawSpecification::new()
        .segment(json!({"type": "basic"}))
        .segment(json!({"related_to_user": 2, "type": "owner"}));
    assert!(compile_unregistered(valid_last).has_valid_segments());
}

#[test]
fn test_unregistered_types_generate_nothing() {
    let post = RawSpecification::new()
        .field("type", "basic")
        .field("related_to_post", 1);
    let query = compile_unregistered(post);
    assert_eq!(query.where_fragment(), "");
    assert_eq!(query.join_fragment(), "");

    let user = RawSpecification::new()
        .field("type", "owner")
        .field("related_to_user", 2);
    let query = compile_unregistered(user);
    assert_eq!(query.where_fragment(), "");
    assert_eq!(query.join_fragment(), "");
}

#[test]
fn test_empty_specification_generates_nothing() {
    let query = compile(RawSpecification::new(), &post_registry());
    assert_eq!(query.where_fragment(), "");
    assert_eq!(query.join_fragment(), "");
}

#[test]
fn test_generate_where_clause() {
    let registry = post_registry();

    let single = RawSpecification::new()
        .field("type", "basic")
        .field("related_to_post", 1);
    assert_eq!(
        compile(single, &registry).where_fragment(),
        " and ((p2p1.id2 = 1 and p2p1.type = 'basic'))"
    );

    assert_eq!(
        compile(two_segments("basic", 3, "OR"), &registry).where_fragment(),
        " and ((p2p1.id2 = 2 and p2p1.type = 'basic') OR (p2p2.id2 = 3 and p2p2.type = 'basic'))"
    );

    assert_eq!(
        compile(two_segments("complex", 4, "AND"), &registry).where_fragment(),
        " and ((p2p1.id2 = 2 and p2p1.type = 'basic') AND (p2p2.id2 = 4 and p2p2.type = 'complex'))"
    );
}

#[test]
fn test_generate_join_clause() {
    let registry = post_registry();

    let single = RawSpecification::new()
        .field("type", "basic")
        .field("related_to_post", 1);
    assert_eq!(
        compile(single, &registry).join_fragment(),
        " inner join wp_post_to_post as p2p1 on wp_posts.ID = p2p1.id1"
    );

    let expected_pair = " inner join wp_post_to_post as p2p1 on wp_posts.ID = p2p1.id1 \
                         inner join wp_post_to_post as p2p2 on wp_posts.ID = p2p2.id1";
    assert_eq!(
        compile(two_segments("basic", 3, "OR"), &registry).join_fragment(),
        expected_pair
    );
    assert_eq!(
        compile(two_segments("complex", 4, "AND"), &registry).join_fragment(),
        expected_pair
    );
}

#[test]
fn test_string_ids_render_as_numbers() {
    let spec = RawSpecification::new()
        .field("related_to_post", "25")
        .field("type", "basic");
    assert_eq!(
        compile(spec, &post_registry()).where_fragment(),
        " and ((p2p1.id2 = 25 and p2p1.type = 'basic'))"
    );
}

#[test]
fn test_aliases_match_between_fragments() {
    let spec = RawSpecification::new()
        .segment(json!({"type": "nope", "related_to_post": 1}))
        .segment(json!({"type": "basic", "related_to_post": 2}))
        .segment(json!({"type": "complex"}))
        .segment(json!({"type": "complex", "related_to_post": 3}))
        .relation("or");
    let query = compile(spec, &post_registry());

    for (expected_index, resolved) in query.resolved_segments().iter().enumerate() {
        let alias = format!("p2p{}", expected_index + 1);
        assert_eq!(resolved.alias(), alias);
        assert!(query.join_fragment().contains(&format!("as {} on", alias)));
        assert!(query.where_fragment().contains(&format!("({}.id2 =", alias)));
    }
    assert_eq!(query.resolved_segments().len(), 2);
    assert!(!query.join_fragment().contains("p2p3"));
    assert!(!query.where_fragment().contains("p2p3"));
}

#[test]
fn test_compilation_is_idempotent() {
    let registry = post_registry();
    let first = compile(two_segments("complex", 4, "OR"), &registry);
    let second = compile(two_segments("complex", 4, "OR"), &registry);
    assert_eq!(first.join_fragment(), second.join_fragment());
    assert_eq!(first.where_fragment(), second.where_fragment());
    assert_eq!(first.fragments(), second.fragments());
}
