//! Error types for mapping operations.

use std::fmt;

use cvs_model::CanonicalField;

/// Errors from building a mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// Column not found in source data.
    ColumnNotFound(String),
    /// Column already mapped to another canonical field.
    ColumnAlreadyUsed {
        column: String,
        field: CanonicalField,
    },
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnNotFound(c) => write!(f, "Column not found: {c}"),
            Self::ColumnAlreadyUsed { column, field } => {
                write!(f, "Column '{column}' already mapped to '{field}'")
            }
        }
    }
}

impl std::error::Error for MappingError {}
