pub mod config;
pub mod errors;
pub mod graph_schema;
pub mod identifier;

// Re-export commonly used types
pub use config::{RegistryConfig, RelationshipDefinition};
pub use errors::RegistryError;
pub use graph_schema::{
    RelationshipColumns, RelationshipKind, RelationshipLookup, RelationshipRegistry,
    RelationshipSchema, POST_KIND, USER_KIND,
};
