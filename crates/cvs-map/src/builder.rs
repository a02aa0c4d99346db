//! Constructing a mapping field by field.
//!
//! [`MappingBuilder`] holds the one-to-one constraint: a source column can
//! back at most one canonical field. [`build_interactively`] drives a
//! [`MappingPrompter`] through every canonical field in schema order and
//! asks again whenever the chosen column is already taken.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use cvs_model::{CanonicalField, ColumnMapping};

use crate::error::MappingError;
use crate::suggest::Suggestion;

/// Attempts per field before the field is left unmapped.
pub const MAX_ATTEMPTS_PER_FIELD: usize = 3;

/// Field-to-column assignments under construction.
#[derive(Debug, Clone, Default)]
pub struct MappingBuilder {
    source_columns: Vec<String>,
    assignments: BTreeMap<CanonicalField, String>,
}

impl MappingBuilder {
    pub fn new(source_columns: Vec<String>) -> Self {
        Self {
            source_columns,
            assignments: BTreeMap::new(),
        }
    }

    pub fn source_columns(&self) -> &[String] {
        &self.source_columns
    }

    /// Assigns `column` to `field`.
    ///
    /// Reassigning a field replaces its previous column. A column already
    /// backing a different field is rejected.
    pub fn assign(&mut self, field: CanonicalField, column: &str) -> Result<(), MappingError> {
        if !self.source_columns.iter().any(|c| c == column) {
            return Err(MappingError::ColumnNotFound(column.to_string()));
        }
        if let Some((owner, _)) = self
            .assignments
            .iter()
            .find(|(owner, used)| **owner != field && used.as_str() == column)
        {
            return Err(MappingError::ColumnAlreadyUsed {
                column: column.to_string(),
                field: *owner,
            });
        }
        self.assignments.insert(field, column.to_string());
        Ok(())
    }

    /// Leaves `field` unmapped, dropping any earlier assignment.
    pub fn skip(&mut self, field: CanonicalField) {
        self.assignments.remove(&field);
    }

    pub fn assigned(&self, field: CanonicalField) -> Option<&str> {
        self.assignments.get(&field).map(String::as_str)
    }

    pub fn is_column_used(&self, column: &str) -> bool {
        self.assignments.values().any(|used| used == column)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Produces the mapping from source column to canonical field.
    pub fn build(&self) -> cvs_model::Result<ColumnMapping> {
        let mut mapping = ColumnMapping::new();
        for (field, column) in &self.assignments {
            mapping.insert(column.clone(), *field)?;
        }
        Ok(mapping)
    }
}

/// Answer to a single field prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChoice {
    /// Map the field to this source column.
    Column(String),
    /// Leave the field unmapped.
    Skip,
}

/// Source of per-field choices during interactive mapping.
pub trait MappingPrompter {
    /// Asks which source column backs `field`.
    ///
    /// `suggested` is a pre-selected column, if one is available and unused.
    fn choose(
        &mut self,
        field: CanonicalField,
        columns: &[String],
        suggested: Option<&str>,
    ) -> anyhow::Result<FieldChoice>;

    /// Called when a choice was rejected; the field is then asked again.
    fn rejected(&mut self, _field: CanonicalField, _error: &MappingError) {}
}

/// Builds a mapping by asking `prompter` about each canonical field.
pub fn build_interactively<P: MappingPrompter + ?Sized>(
    columns: &[String],
    suggestions: &[Suggestion],
    prompter: &mut P,
) -> anyhow::Result<ColumnMapping> {
    let mut builder = MappingBuilder::new(columns.to_vec());

    for field in CanonicalField::ALL {
        let suggested = suggestions
            .iter()
            .find(|s| s.field == field)
            .map(|s| s.source_column.as_str())
            .filter(|column| !builder.is_column_used(column));

        let mut attempts = 0;
        loop {
            attempts += 1;
            match prompter.choose(field, columns, suggested)? {
                FieldChoice::Skip => {
                    builder.skip(field);
                    debug!(field = %field, "field skipped");
                    break;
                }
                FieldChoice::Column(column) => match builder.assign(field, &column) {
                    Ok(()) => {
                        debug!(field = %field, column = %column, "field mapped");
                        break;
                    }
                    Err(error) => {
                        warn!(field = %field, %error, "mapping choice rejected");
                        prompter.rejected(field, &error);
                        if attempts >= MAX_ATTEMPTS_PER_FIELD {
                            warn!(field = %field, attempts, "leaving field unmapped");
                            break;
                        }
                    }
                },
            }
        }
    }

    let mapping = builder.build()?;
    info!(
        mapped = mapping.len(),
        fields = CanonicalField::ALL.len(),
        "interactive mapping complete"
    );
    Ok(mapping)
}
