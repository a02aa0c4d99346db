//! Survey report output.
//!
//! - **Charts**: RGB rasters for symptom frequency, device usage and breaks
//! - **PDF**: A4 report with a summary page and one page per chart

#![deny(unsafe_code)]

pub mod charts;
pub mod pdf;
pub mod report;

pub use charts::{ChartImage, render_charts, save_png};
pub use report::{
    DEFAULT_REPORT_FILE, DEFAULT_TITLE, ReportOptions, ReportOutput, generate_report, risk_line,
    summary_lines,
};
