use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::schema::CanonicalField;

/// Raw tabular input before column mapping.
///
/// `headers` are the source column names; every row has exactly
/// `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SourceTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One survey response keyed by canonical field.
///
/// Blank values are never stored: a field is either present with
/// non-empty text or absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyRecord {
    values: BTreeMap<CanonicalField, String>,
}

impl SurveyRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, mostly for tests and manual entry.
    #[must_use]
    pub fn with(mut self, field: CanonicalField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Sets a value; a blank value marks the field absent.
    pub fn set(&mut self, field: CanonicalField, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            self.values.remove(&field);
        } else {
            self.values.insert(field, value);
        }
    }

    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn is_present(&self, field: CanonicalField) -> bool {
        self.values.contains_key(&field)
    }

    /// Present values in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &str)> {
        self.values.iter().map(|(field, value)| (*field, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A uniform collection of records produced by either input adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Canonical columns provided by the source, in schema order.
    pub columns: Vec<CanonicalField>,
    pub records: Vec<SurveyRecord>,
}

impl RecordSet {
    pub fn new(columns: impl IntoIterator<Item = CanonicalField>) -> Self {
        let columns: BTreeSet<CanonicalField> = columns.into_iter().collect();
        Self {
            columns: columns.into_iter().collect(),
            records: Vec::new(),
        }
    }

    /// A record set exposing the full canonical schema.
    pub fn with_all_columns() -> Self {
        Self::new(CanonicalField::ALL)
    }

    pub fn push(&mut self, record: SurveyRecord) {
        self.records.push(record);
    }

    pub fn has_column(&self, field: CanonicalField) -> bool {
        self.columns.binary_search(&field).is_ok()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
