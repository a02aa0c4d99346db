//! Survey report assembly.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use tracing::{info, info_span};

use cvs_core::Analysis;
use cvs_model::ScoredRecord;

use crate::charts::{ChartImage, render_charts, save_png};
use crate::pdf::{Align, FontStyle, ReportDocument};

/// Default output file of the report.
pub const DEFAULT_REPORT_FILE: &str = "CVS_Report.pdf";
/// Default report title.
pub const DEFAULT_TITLE: &str = "Computer Vision Syndrome Survey Report";

const TITLE_SIZE: i64 = 16;
const HEADING_SIZE: i64 = 12;
const BODY_SIZE: i64 = 11;
const CHART_WIDTH_PT: i64 = 480;

/// Options for report output.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,
    pub output: PathBuf,
    /// Directory to also write the chart PNGs into.
    pub charts_dir: Option<PathBuf>,
    pub generated_on: NaiveDate,
}

impl ReportOptions {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            output: output.into(),
            charts_dir: None,
            generated_on: Local::now().date_naive(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_charts_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.charts_dir = dir;
        self
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_FILE)
    }
}

/// What was written.
#[derive(Debug, Clone)]
pub struct ReportOutput {
    pub path: PathBuf,
    pub pages: usize,
    pub chart_files: Vec<PathBuf>,
}

/// `<identifier>: Score=<score>, Risk=<level>`
pub fn risk_line(record: &ScoredRecord) -> String {
    format!(
        "{}: Score={}, Risk={}",
        record.identifier(),
        record.score(),
        record.level()
    )
}

/// Text of the summary section, in page order.
pub fn summary_lines(analysis: &Analysis) -> Vec<String> {
    let summary = &analysis.summary;
    let mut lines = vec![summary.respondents_line()];
    lines.extend(summary.average_lines());
    lines.extend(summary.risk_lines());
    lines
}

/// Writes the PDF report and, when configured, the chart PNGs.
pub fn generate_report(analysis: &Analysis, options: &ReportOptions) -> Result<ReportOutput> {
    let span = info_span!("report", path = %options.output.display());
    let _guard = span.enter();
    let start = Instant::now();

    let charts = render_charts(&analysis.charts);
    let chart_files = match &options.charts_dir {
        Some(dir) => write_chart_files(&charts, dir)?,
        None => Vec::new(),
    };

    let mut doc = ReportDocument::new();
    write_summary_page(&mut doc, analysis, options);
    for chart in &charts {
        write_chart_page(&mut doc, chart);
    }
    let pages = doc.save(&options.output)?;

    info!(
        record_count = analysis.respondents(),
        pages,
        charts = charts.len(),
        duration_ms = start.elapsed().as_millis(),
        "report written"
    );
    Ok(ReportOutput {
        path: options.output.clone(),
        pages,
        chart_files,
    })
}

fn write_chart_files(charts: &[ChartImage], dir: &Path) -> Result<Vec<PathBuf>> {
    charts.iter().map(|chart| save_png(chart, dir)).collect()
}

fn write_summary_page(doc: &mut ReportDocument, analysis: &Analysis, options: &ReportOptions) {
    doc.text(&options.title, FontStyle::Bold, TITLE_SIZE, Align::Center);
    doc.text(
        &format!("Generated: {}", options.generated_on.format("%Y-%m-%d")),
        FontStyle::Regular,
        BODY_SIZE,
        Align::Center,
    );
    doc.space(20);

    doc.text("Summary Statistics:", FontStyle::Bold, HEADING_SIZE, Align::Left);
    for line in summary_lines(analysis) {
        doc.text(&line, FontStyle::Regular, BODY_SIZE, Align::Left);
    }
    doc.space(10);

    doc.text("Student Risk Summary:", FontStyle::Bold, HEADING_SIZE, Align::Left);
    for record in &analysis.scored {
        doc.text(&risk_line(record), FontStyle::Regular, BODY_SIZE, Align::Left);
    }
}

fn write_chart_page(doc: &mut ReportDocument, chart: &ChartImage) {
    doc.new_page();
    doc.text(&chart.kind.heading(), FontStyle::Bold, HEADING_SIZE, Align::Left);
    doc.space(6);
    doc.image(&chart.image, CHART_WIDTH_PT);
    doc.space(10);
    for line in &chart.caption {
        doc.text(line, FontStyle::Regular, BODY_SIZE, Align::Left);
    }
}
