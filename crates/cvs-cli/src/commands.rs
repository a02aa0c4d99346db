//! Command implementations. Output goes to the given writer.

use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use cvs_core::{MappingOrigin, MappingResolver, analyze, import_table};
use cvs_ingest::{form_from_assignments, read_csv_table};
use cvs_map::{JsonFileStore, MappingStore, suggest_mapping};
use cvs_model::RecordSet;
use cvs_report::{ReportOutput, generate_report};

use crate::prompt::prompt_form;
use crate::settings::RunConfig;
use crate::summary::{
    PREVIEW_ROWS, fields_table, mapping_table, preview_table, risk_table, suggestion_table,
};

/// Manual entry of one response, from `--set` assignments or prompts.
pub fn run_entry<R: BufRead, W: Write>(
    config: &RunConfig,
    assignments: &[String],
    input: &mut R,
    output: &mut W,
) -> Result<ReportOutput> {
    let records = if assignments.is_empty() {
        prompt_form(input, output)?.into_record_set()
    } else {
        form_from_assignments(assignments)?
    };
    info!(record_count = records.len(), "manual entry captured");
    analyze_and_report(config, &records, output)
}

/// Bulk import of a CSV export.
pub fn run_import<W: Write>(
    config: &RunConfig,
    csv_path: &Path,
    resolver: &mut dyn MappingResolver,
    save_mapping: bool,
    output: &mut W,
) -> Result<ReportOutput> {
    let ingest_span = info_span!("ingest", path = %csv_path.display());
    let ingest_start = Instant::now();
    let table = ingest_span.in_scope(|| read_csv_table(csv_path))?;
    info!(
        path = %csv_path.display(),
        record_count = table.len(),
        columns = table.headers.len(),
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );

    let mut store = JsonFileStore::new(&config.mapping_file);
    let outcome = import_table(&table, &mut store, resolver, save_mapping)?;
    match outcome.origin {
        MappingOrigin::Stored => writeln!(
            output,
            "Using saved mapping: {}",
            config.mapping_file.display()
        )?,
        MappingOrigin::Resolved { saved: true } => writeln!(
            output,
            "Mapping saved: {}",
            config.mapping_file.display()
        )?,
        MappingOrigin::Resolved { saved: false } => {
            writeln!(output, "Mapping applied for this run only (not saved)")?;
        }
    }
    if !outcome.mapped.unmapped_columns.is_empty() {
        writeln!(
            output,
            "Dropped {} unmapped column(s)",
            outcome.mapped.unmapped_columns.len()
        )?;
    }

    analyze_and_report(config, &outcome.mapped.records, output)
}

fn analyze_and_report<W: Write>(
    config: &RunConfig,
    records: &RecordSet,
    output: &mut W,
) -> Result<ReportOutput> {
    writeln!(output)?;
    writeln!(output, "Data Preview")?;
    writeln!(output, "{}", preview_table(records, PREVIEW_ROWS))?;

    let analysis = analyze(records);
    writeln!(output)?;
    writeln!(output, "Risk Summary")?;
    writeln!(output, "{}", risk_table(&analysis.scored))?;

    let report = generate_report(&analysis, &config.report_options())?;
    writeln!(
        output,
        "PDF report generated: {} ({} pages)",
        report.path.display(),
        report.pages
    )?;
    for path in &report.chart_files {
        writeln!(output, "Chart written: {}", path.display())?;
    }
    Ok(report)
}

/// Prints the saved mapping.
pub fn run_mapping_show<W: Write>(config: &RunConfig, output: &mut W) -> Result<()> {
    let store = JsonFileStore::new(&config.mapping_file);
    match store.load()? {
        Some(mapping) => {
            writeln!(output, "Mapping: {}", store.describe())?;
            writeln!(output, "{}", mapping_table(&mapping))?;
        }
        None => writeln!(output, "No saved mapping at {}", store.describe())?,
    }
    Ok(())
}

/// Deletes the saved mapping.
pub fn run_mapping_reset<W: Write>(config: &RunConfig, output: &mut W) -> Result<()> {
    let mut store = JsonFileStore::new(&config.mapping_file);
    if store.reset()? {
        info!(path = %store.describe(), "mapping reset");
        writeln!(output, "Mapping reset: {}", store.describe())?;
    } else {
        writeln!(output, "No saved mapping at {}", store.describe())?;
    }
    Ok(())
}

/// Shows what `--auto-map` would use for a CSV, without saving anything.
pub fn run_mapping_suggest<W: Write>(
    csv_path: &Path,
    min_confidence: f32,
    output: &mut W,
) -> Result<()> {
    let table = read_csv_table(csv_path)
        .with_context(|| format!("Failed to read header of {}", csv_path.display()))?;
    let suggestions = suggest_mapping(&table.headers, min_confidence);
    writeln!(output, "{}", suggestion_table(&suggestions))?;
    writeln!(
        output,
        "{} of {} columns matched",
        suggestions.len(),
        table.headers.len()
    )?;
    Ok(())
}

/// Lists the canonical schema.
pub fn run_fields<W: Write>(output: &mut W) -> Result<()> {
    writeln!(output, "{}", fields_table())?;
    Ok(())
}
