//! Column mapping from source headers to the canonical schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::schema::CanonicalField;

/// Source column name -> canonical field.
///
/// Keys are unique by construction. Each canonical field may be targeted by
/// at most one source column; a second source for the same field is
/// rejected rather than silently overwriting the first.
///
/// Serialized as a flat JSON object, e.g.
/// `{"How old are you?": "age"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, CanonicalField>",
    into = "BTreeMap<String, CanonicalField>"
)]
pub struct ColumnMapping {
    entries: BTreeMap<String, CanonicalField>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `source -> field`.
    ///
    /// Re-inserting an existing source replaces its target. Fails when a
    /// different source already targets `field`.
    pub fn insert(&mut self, source: impl Into<String>, field: CanonicalField) -> Result<()> {
        let source = source.into();
        if let Some(existing) = self.source_for(field)
            && existing != source
        {
            return Err(ModelError::DuplicateTarget {
                field,
                existing: existing.to_string(),
                incoming: source,
            });
        }
        self.entries.insert(source, field);
        Ok(())
    }

    pub fn target(&self, source: &str) -> Option<CanonicalField> {
        self.entries.get(source).copied()
    }

    /// Reverse lookup: which source column feeds `field`.
    pub fn source_for(&self, field: CanonicalField) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, target)| **target == field)
            .map(|(source, _)| source.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, CanonicalField)> {
        self.entries
            .iter()
            .map(|(source, field)| (source.as_str(), *field))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<BTreeMap<String, CanonicalField>> for ColumnMapping {
    type Error = ModelError;

    fn try_from(entries: BTreeMap<String, CanonicalField>) -> Result<Self> {
        let mut mapping = ColumnMapping::new();
        for (source, field) in entries {
            mapping.insert(source, field)?;
        }
        Ok(mapping)
    }
}

impl From<ColumnMapping> for BTreeMap<String, CanonicalField> {
    fn from(mapping: ColumnMapping) -> Self {
        mapping.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_second_source_for_same_field() {
        let mut mapping = ColumnMapping::new();
        mapping.insert("Age (years)", CanonicalField::Age).unwrap();
        let err = mapping
            .insert("How old are you?", CanonicalField::Age)
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::DuplicateTarget {
                field: CanonicalField::Age,
                existing: "Age (years)".to_string(),
                incoming: "How old are you?".to_string(),
            }
        );
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn reinserting_a_source_retargets_it() {
        let mut mapping = ColumnMapping::new();
        mapping.insert("Q1", CanonicalField::Age).unwrap();
        mapping.insert("Q1", CanonicalField::AgeGroup).unwrap();
        assert_eq!(mapping.target("Q1"), Some(CanonicalField::AgeGroup));
        assert_eq!(mapping.source_for(CanonicalField::Age), None);
    }
}
