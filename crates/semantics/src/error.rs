use thiserror::Error;

pub type Result<T> = std::result::Result<T, SemanticsError>;

#[derive(Error, Debug)]
pub enum SemanticsError {
    #[error("concept name must not be empty")]
    EmptyConceptName,

    #[error("duplicate concept `{0}`")]
    DuplicateConcept(String),

    #[error("concept `{0}` has no trigger keywords")]
    EmptyTriggers(String),

    #[error("domain rule key must not be empty")]
    EmptyDomainKey,

    #[error("domain rule `{0}` lists no compatible categories")]
    EmptyDomainCategories(String),

    #[error("malformed table: {0}")]
    Malformed(String),
}
