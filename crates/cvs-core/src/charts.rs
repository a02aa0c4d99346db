//! Chart data derived from the scored records.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use cvs_model::{CanonicalField, SYMPTOM_FIELDS, ScoredRecord};

use crate::risk::answered_yes;
use crate::values::{ValueError, parse_break_frequency};

/// Chart keys in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChartKind {
    Symptoms,
    Devices,
    Breaks,
}

impl ChartKind {
    pub fn key(&self) -> &'static str {
        match self {
            ChartKind::Symptoms => "symptoms",
            ChartKind::Devices => "devices",
            ChartKind::Breaks => "breaks",
        }
    }

    /// Page heading, e.g. "Symptoms Chart".
    pub fn heading(&self) -> String {
        let key = self.key();
        let mut chars = key.chars();
        match chars.next() {
            Some(first) => format!("{}{} Chart", first.to_ascii_uppercase(), chars.as_str()),
            None => "Chart".to_string(),
        }
    }
}

/// Number of "yes" answers for one symptom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomFrequency {
    pub field: CanonicalField,
    pub count: usize,
}

/// Number of respondents naming one device answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceUsage {
    pub label: String,
    pub count: usize,
}

/// One scatter point: breaks per hour against "yes" symptom count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakPoint {
    pub breaks: u32,
    pub symptoms: u32,
}

/// Break scatter data and the rows left out of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreakSeries {
    pub points: Vec<BreakPoint>,
    /// 1-based rows whose break frequency could not be read.
    pub skipped_rows: Vec<usize>,
}

/// All chart data for one report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartSet {
    pub symptoms: Vec<SymptomFrequency>,
    pub devices: Option<Vec<DeviceUsage>>,
    pub breaks: Option<BreakSeries>,
}

impl ChartSet {
    /// Charts that have data, in report order.
    pub fn kinds(&self) -> Vec<ChartKind> {
        let mut kinds = vec![ChartKind::Symptoms];
        if self.devices.is_some() {
            kinds.push(ChartKind::Devices);
        }
        if self.breaks.is_some() {
            kinds.push(ChartKind::Breaks);
        }
        kinds
    }
}

/// "Yes" counts for each of the five symptom questions.
pub fn symptom_frequency(scored: &[ScoredRecord]) -> Vec<SymptomFrequency> {
    SYMPTOM_FIELDS
        .iter()
        .map(|field| SymptomFrequency {
            field: *field,
            count: scored
                .iter()
                .filter(|s| answered_yes(s.record.get(*field)))
                .count(),
        })
        .collect()
}

/// Device answer counts, most common first, then by label.
///
/// Returns `None` when no record names a device.
pub fn device_usage(scored: &[ScoredRecord]) -> Option<Vec<DeviceUsage>> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in scored {
        if let Some(device) = record.record.get(CanonicalField::Devices) {
            *counts.entry(device.trim()).or_default() += 1;
        }
    }
    if counts.is_empty() {
        return None;
    }
    let mut usage: Vec<DeviceUsage> = counts
        .into_iter()
        .map(|(label, count)| DeviceUsage {
            label: label.to_string(),
            count,
        })
        .collect();
    usage.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    Some(usage)
}

/// Break frequency against "yes" symptom count, one point per record.
///
/// An absent break frequency plots as 0; unreadable ones are skipped.
pub fn break_series(scored: &[ScoredRecord]) -> BreakSeries {
    let mut series = BreakSeries::default();
    for record in scored {
        let breaks = match parse_break_frequency(record.record.get(CanonicalField::BreakFrequency)) {
            Ok(breaks) => breaks,
            Err(ValueError::Absent) => 0,
            Err(ValueError::Malformed { .. }) => {
                series.skipped_rows.push(record.index + 1);
                continue;
            }
        };
        let symptoms = SYMPTOM_FIELDS
            .iter()
            .filter(|field| answered_yes(record.record.get(**field)))
            .count() as u32;
        series.points.push(BreakPoint { breaks, symptoms });
    }
    if !series.skipped_rows.is_empty() {
        warn!(
            skipped = series.skipped_rows.len(),
            "break frequency unreadable, rows left out of the breaks chart"
        );
    }
    series
}

/// Builds every chart the available columns allow.
///
/// `columns` are the canonical fields the source provided.
pub fn build_chart_set(columns: &[CanonicalField], scored: &[ScoredRecord]) -> ChartSet {
    let devices = if columns.contains(&CanonicalField::Devices) {
        device_usage(scored)
    } else {
        None
    };
    let breaks = columns
        .contains(&CanonicalField::BreakFrequency)
        .then(|| break_series(scored));

    let charts = ChartSet {
        symptoms: symptom_frequency(scored),
        devices,
        breaks,
    };
    debug!(charts = charts.kinds().len(), "chart data built");
    charts
}
