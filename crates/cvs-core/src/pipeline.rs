//! End-to-end survey pipeline: resolve a mapping, apply it, score, summarize.
//!
//! # Stages
//!
//! 1. **Mapping** - load the stored mapping, or resolve a new one and
//!    optionally save it ([`import_table`])
//! 2. **Scoring** - one [`RiskAssessment`](cvs_model::RiskAssessment) per record
//! 3. **Summary** - respondent count, hour means, risk distribution
//! 4. **Charts** - chart data for the report

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use cvs_map::{
    MappedTable, MappingPrompter, MappingStore, apply_mapping, build_interactively,
    suggest_mapping, suggestions_to_mapping,
};
use cvs_model::{CanonicalField, ColumnMapping, RecordSet, ScoredRecord, SourceTable};

use crate::charts::{ChartSet, build_chart_set};
use crate::risk::score_records;
use crate::stats::SummaryStatistics;

/// Everything the report needs.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Canonical fields the input provided.
    pub columns: Vec<CanonicalField>,
    pub scored: Vec<ScoredRecord>,
    pub summary: SummaryStatistics,
    pub charts: ChartSet,
}

impl Analysis {
    pub fn respondents(&self) -> usize {
        self.scored.len()
    }
}

/// Scores the records and derives statistics and chart data.
pub fn analyze(records: &RecordSet) -> Analysis {
    let span = info_span!("analyze", record_count = records.len());
    let _guard = span.enter();
    let start = Instant::now();

    let scored = score_records(records);
    let summary = SummaryStatistics::compute(records, &scored);
    let charts = build_chart_set(&records.columns, &scored);

    info!(
        record_count = scored.len(),
        charts = charts.kinds().len(),
        duration_ms = start.elapsed().as_millis(),
        "analysis complete"
    );
    Analysis {
        columns: records.columns.clone(),
        scored,
        summary,
        charts,
    }
}

/// Produces a mapping when none is stored.
pub trait MappingResolver {
    fn resolve(&mut self, columns: &[String]) -> Result<ColumnMapping>;
}

/// Accepts fuzzy suggestions without asking.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionResolver {
    pub min_confidence: f32,
}

impl Default for SuggestionResolver {
    fn default() -> Self {
        Self {
            min_confidence: cvs_map::DEFAULT_MIN_CONFIDENCE,
        }
    }
}

impl MappingResolver for SuggestionResolver {
    fn resolve(&mut self, columns: &[String]) -> Result<ColumnMapping> {
        let suggestions = suggest_mapping(columns, self.min_confidence);
        info!(
            suggested = suggestions.len(),
            columns = columns.len(),
            "mapping built from suggestions"
        );
        suggestions_to_mapping(&suggestions).context("suggested mapping is not one-to-one")
    }
}

/// Asks the operator field by field, with suggestions as defaults.
pub struct InteractiveResolver<P> {
    prompter: P,
    min_confidence: f32,
}

impl<P: MappingPrompter> InteractiveResolver<P> {
    pub fn new(prompter: P) -> Self {
        Self {
            prompter,
            min_confidence: cvs_map::DEFAULT_MIN_CONFIDENCE,
        }
    }

    pub fn into_inner(self) -> P {
        self.prompter
    }
}

impl<P: MappingPrompter> MappingResolver for InteractiveResolver<P> {
    fn resolve(&mut self, columns: &[String]) -> Result<ColumnMapping> {
        let suggestions = suggest_mapping(columns, self.min_confidence);
        build_interactively(columns, &suggestions, &mut self.prompter)
    }
}

/// Where the mapping used for an import came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingOrigin {
    /// Loaded from the store.
    Stored,
    /// Built for this run; `saved` tells whether it was persisted.
    Resolved { saved: bool },
}

/// Result of mapping a source table.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub mapping: ColumnMapping,
    pub origin: MappingOrigin,
    pub mapped: MappedTable,
}

/// Maps a source table onto the canonical schema.
///
/// A stored mapping is used as is. Otherwise `resolver` builds one, which is
/// saved to `store` when `save_mapping` is set; an unsaved mapping still
/// applies to this run.
pub fn import_table(
    table: &SourceTable,
    store: &mut dyn MappingStore,
    resolver: &mut dyn MappingResolver,
    save_mapping: bool,
) -> Result<ImportOutcome> {
    let span = info_span!("mapping", store = %store.describe(), columns = table.headers.len());
    let _guard = span.enter();
    let start = Instant::now();

    let (mapping, origin) = match store.load()? {
        Some(mapping) => {
            info!(entries = mapping.len(), "using stored mapping");
            (mapping, MappingOrigin::Stored)
        }
        None => {
            let mapping = resolver.resolve(&table.headers)?;
            if mapping.is_empty() {
                warn!("mapping has no entries, every column will be dropped");
            }
            let saved = if save_mapping {
                store.save(&mapping)?;
                info!(entries = mapping.len(), "mapping saved");
                true
            } else {
                false
            };
            (mapping, MappingOrigin::Resolved { saved })
        }
    };

    let mapped = apply_mapping(&mapping, table);
    info!(
        record_count = mapped.records.len(),
        mapped_columns = mapped.records.columns.len(),
        dropped_columns = mapped.unmapped_columns.len(),
        duration_ms = start.elapsed().as_millis(),
        "mapping stage complete"
    );
    Ok(ImportOutcome {
        mapping,
        origin,
        mapped,
    })
}
