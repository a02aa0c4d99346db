//! Renaming source columns to canonical fields.

use tracing::{debug, warn};

use cvs_model::{CanonicalField, ColumnMapping, RecordSet, SourceTable, SurveyRecord};

/// Result of applying a mapping to a source table.
#[derive(Debug, Clone, Default)]
pub struct MappedTable {
    /// Canonical view; only mapped fields appear in `records.columns`.
    pub records: RecordSet,
    /// Source columns with no entry in the mapping (dropped).
    pub unmapped_columns: Vec<String>,
    /// Mapping keys that the source header does not contain.
    pub missing_sources: Vec<String>,
}

/// Renames the source columns that appear as mapping keys.
///
/// Columns without a mapping entry are dropped from the canonical view.
/// Canonical fields nobody maps to are left absent: they are not listed
/// in `columns` and every record returns `None` for them.
pub fn apply_mapping(mapping: &ColumnMapping, table: &SourceTable) -> MappedTable {
    let mut selected: Vec<(usize, CanonicalField)> = Vec::new();
    let mut unmapped_columns = Vec::new();
    for (idx, header) in table.headers.iter().enumerate() {
        match mapping.target(header) {
            Some(field) => selected.push((idx, field)),
            None => unmapped_columns.push(header.clone()),
        }
    }

    let missing_sources: Vec<String> = mapping
        .iter()
        .filter(|(source, _)| table.column_index(source).is_none())
        .map(|(source, _)| source.to_string())
        .collect();
    if !missing_sources.is_empty() {
        warn!(
            missing = missing_sources.len(),
            "mapped source columns not found in input"
        );
    }

    let mut records = RecordSet::new(selected.iter().map(|(_, field)| *field));
    for row in &table.rows {
        let mut record = SurveyRecord::new();
        for (idx, field) in &selected {
            if let Some(value) = row.get(*idx) {
                record.set(*field, value.as_str());
            }
        }
        records.push(record);
    }

    debug!(
        mapped = selected.len(),
        unmapped = unmapped_columns.len(),
        rows = records.len(),
        "mapping applied"
    );

    MappedTable {
        records,
        unmapped_columns,
        missing_sources,
    }
}
