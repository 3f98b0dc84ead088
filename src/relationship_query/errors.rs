use thiserror::Error;

/// Failures turning caller input into a [`RawSpecification`].
///
/// Compilation itself never fails; these only arise when parsing text or
/// converting an arbitrary JSON value.
///
/// [`RawSpecification`]: super::specification::RawSpecification
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SpecificationError {
    #[error("Specification is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Specification must be a JSON object or array, found {found}")]
    UnsupportedTopLevel { found: &'static str },
}
