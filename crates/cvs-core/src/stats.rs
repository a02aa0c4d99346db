//! Summary statistics for the report's first page.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use cvs_model::{CanonicalField, RecordSet, RiskLevel, ScoredRecord};

use crate::values::{ValueError, parse_hours};

/// Placeholder shown when either mean cannot be computed.
pub const HOURS_UNAVAILABLE: &str = "Average hours not available";

/// Why a column mean is not available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatError {
    /// The column is not mapped, or holds no values.
    #[error("no {field} values to average")]
    Undefined { field: CanonicalField },
    /// A value could not be read as a number of hours (1-based row).
    #[error("malformed {field} value in row {row}")]
    Malformed {
        field: CanonicalField,
        row: usize,
        value: String,
    },
}

/// Arithmetic mean of an hours column, ignoring absent answers.
pub fn mean_hours(records: &RecordSet, field: CanonicalField) -> Result<f64, StatError> {
    if !records.has_column(field) {
        return Err(StatError::Undefined { field });
    }
    let mut sum = 0.0;
    let mut count = 0usize;
    for (idx, record) in records.records.iter().enumerate() {
        match parse_hours(record.get(field)) {
            Ok(hours) => {
                sum += hours;
                count += 1;
            }
            Err(ValueError::Absent) => {}
            Err(ValueError::Malformed { raw }) => {
                return Err(StatError::Malformed {
                    field,
                    row: idx + 1,
                    value: raw,
                });
            }
        }
    }
    if count == 0 {
        return Err(StatError::Undefined { field });
    }
    Ok(sum / count as f64)
}

/// Figures printed under "Summary Statistics".
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStatistics {
    pub respondents: usize,
    pub mean_academic: Result<f64, StatError>,
    pub mean_non_academic: Result<f64, StatError>,
    pub risk_counts: BTreeMap<RiskLevel, usize>,
}

impl SummaryStatistics {
    pub fn compute(records: &RecordSet, scored: &[ScoredRecord]) -> Self {
        let mean_academic = mean_hours(records, CanonicalField::HoursAcademic);
        let mean_non_academic = mean_hours(records, CanonicalField::HoursNonAcademic);
        for error in [&mean_academic, &mean_non_academic]
            .into_iter()
            .filter_map(|r| r.as_ref().err())
        {
            debug!(%error, "average hours unavailable");
        }

        let mut risk_counts: BTreeMap<RiskLevel, usize> =
            RiskLevel::ALL.iter().map(|level| (*level, 0)).collect();
        for record in scored {
            *risk_counts.entry(record.level()).or_default() += 1;
        }

        Self {
            respondents: records.len(),
            mean_academic,
            mean_non_academic,
            risk_counts,
        }
    }

    pub fn risk_count(&self, level: RiskLevel) -> usize {
        self.risk_counts.get(&level).copied().unwrap_or(0)
    }

    /// Both average lines, or the single placeholder line.
    pub fn average_lines(&self) -> Vec<String> {
        match (&self.mean_academic, &self.mean_non_academic) {
            (Ok(academic), Ok(non_academic)) => vec![
                format!("Average Academic Hours: {academic:.2}"),
                format!("Average Non-Academic Hours: {non_academic:.2}"),
            ],
            _ => vec![HOURS_UNAVAILABLE.to_string()],
        }
    }

    pub fn respondents_line(&self) -> String {
        format!("Total Respondents: {}", self.respondents)
    }

    /// One line per risk level, Low to High.
    pub fn risk_lines(&self) -> Vec<String> {
        RiskLevel::ALL
            .iter()
            .map(|level| format!("{level} Risk: {}", self.risk_count(*level)))
            .collect()
    }
}
