//! Registry loading from YAML files on disk

use std::io::Write;

use relquery::graph_catalog::{RegistryConfig, RegistryError, RelationshipKind, RelationshipLookup};
use tempfile::NamedTempFile;

fn write_yaml(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write yaml");
    file
}

#[test]
fn test_registry_from_yaml_file() {
    let file = write_yaml(
        r#"
table_prefix: wp_
relationships:
  - kind: post_to_post
    from: post
    to: car
    type: tire
  - kind: post_to_user
    from: car
    type: owner
"#,
    );

    let registry = RegistryConfig::from_yaml_file(file.path())
        .unwrap()
        .to_registry()
        .unwrap();

    assert_eq!(registry.relationship_count(), 2);
    let kinds: Vec<RelationshipKind> = registry.relationships().map(|r| r.kind).collect();
    assert_eq!(kinds, vec![RelationshipKind::PostToPost, RelationshipKind::PostToUser]);

    // Post-to-post is symmetric, post-to-user is keyed by the post kind
    assert!(registry.lookup("car", "post", "tire").is_some());
    assert!(registry.lookup("post", "car", "tire").is_some());
    assert!(registry.lookup("car", "user", "owner").is_some());
    assert!(registry.lookup("post", "user", "owner").is_none());
}

#[test]
fn test_invalid_prefix_in_file() {
    let file = write_yaml("table_prefix: \"wp-\"\nrelationships: []\n");
    let err = RegistryConfig::from_yaml_file(file.path())
        .unwrap()
        .to_registry()
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::InvalidIdentifier {
            field: "table_prefix".to_string(),
            value: "wp-".to_string(),
        }
    );
}

#[test]
fn test_malformed_yaml_file() {
    let file = write_yaml("relationships: [ {kind: post_to_post");
    let err = RegistryConfig::from_yaml_file(file.path()).unwrap_err();
    assert!(matches!(err, RegistryError::ConfigParseError { .. }));
}
