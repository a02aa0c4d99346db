//! Manual single-response entry.
//!
//! A form always exposes the full canonical schema, so every field is a
//! column of the resulting record set even when left blank.

use tracing::debug;

use cvs_model::{CanonicalField, RecordSet, SurveyRecord};

use crate::error::{IngestError, Result};

/// One manually entered survey response.
#[derive(Debug, Clone, Default)]
pub struct FormEntry {
    record: SurveyRecord,
}

impl FormEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: CanonicalField, value: impl Into<String>) {
        self.record.set(field, value);
    }

    /// Applies a `field=value` assignment. Only the first `=` separates.
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<()> {
        let (field, value) = parse_assignment(assignment)?;
        self.set(field, value);
        Ok(())
    }

    pub fn record(&self) -> &SurveyRecord {
        &self.record
    }

    pub fn into_record_set(self) -> RecordSet {
        debug!(filled = self.record.len(), "form entry submitted");
        let mut set = RecordSet::with_all_columns();
        set.push(self.record);
        set
    }
}

/// Splits `field=value` into a canonical field and its raw value.
pub fn parse_assignment(assignment: &str) -> Result<(CanonicalField, String)> {
    let Some((name, value)) = assignment.split_once('=') else {
        return Err(IngestError::MalformedAssignment(assignment.to_string()));
    };
    let field: CanonicalField = name.parse()?;
    Ok((field, value.trim().to_string()))
}

/// Builds a single-record set from `field=value` assignments.
pub fn form_from_assignments<S: AsRef<str>>(assignments: &[S]) -> Result<RecordSet> {
    let mut entry = FormEntry::new();
    for assignment in assignments {
        entry.apply_assignment(assignment.as_ref())?;
    }
    Ok(entry.into_record_set())
}
