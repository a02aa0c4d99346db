use thiserror::Error;

use crate::schema::CanonicalField;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown canonical field: {0}")]
    UnknownField(String),
    #[error(
        "canonical field '{field}' is already mapped from '{existing}', cannot also map '{incoming}'"
    )]
    DuplicateTarget {
        field: CanonicalField,
        existing: String,
        incoming: String,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
