//! CLI argument definitions for the survey reporter.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use cvs_cli::logging::LogFormat;
use cvs_map::DEFAULT_MIN_CONFIDENCE;

#[derive(Parser)]
#[command(
    name = "cvs-survey",
    version,
    about = "Computer vision syndrome survey reporter",
    long_about = "Score computer vision syndrome survey responses and write a PDF report.\n\n\
                  Responses come from manual entry or a Google Forms CSV export. CSV\n\
                  columns are mapped onto a fixed schema once and the mapping is saved\n\
                  for later imports."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file (default: cvs-survey.toml in the working directory, if present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Saved column mapping (default: google_forms_mapping.json).
    #[arg(long = "mapping-file", value_name = "PATH", global = true)]
    pub mapping_file: Option<PathBuf>,

    /// PDF report path (default: CVS_Report.pdf).
    #[arg(short = 'o', long = "output", value_name = "PATH", global = true)]
    pub output: Option<PathBuf>,

    /// Also write each chart as PNG into this directory.
    #[arg(long = "charts-dir", value_name = "DIR", global = true)]
    pub charts_dir: Option<PathBuf>,

    /// Report title.
    #[arg(long = "title", value_name = "TEXT", global = true)]
    pub title: Option<String>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow respondent answers in trace logs (redacted otherwise).
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Enter one response by hand and write the report.
    Entry(EntryArgs),

    /// Import a CSV export and write the report.
    Import(ImportArgs),

    /// Inspect, reset or preview the column mapping.
    #[command(subcommand)]
    Mapping(MappingCommand),

    /// List the canonical survey fields.
    Fields,
}

#[derive(Parser)]
pub struct EntryArgs {
    /// Field value as FIELD=VALUE; repeatable. Prompts for every field when omitted.
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub set: Vec<String>,
}

#[derive(Parser)]
pub struct ImportArgs {
    /// CSV file with a header row.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Build a missing mapping from suggestions instead of prompting.
    #[arg(long = "auto-map")]
    pub auto_map: bool,

    /// Use a newly built mapping for this run only.
    #[arg(long = "no-save-mapping")]
    pub no_save_mapping: bool,
}

#[derive(Subcommand)]
pub enum MappingCommand {
    /// Print the saved mapping.
    Show,

    /// Delete the saved mapping.
    Reset,

    /// Preview suggested mappings for a CSV header.
    Suggest {
        /// CSV file with a header row.
        #[arg(value_name = "CSV")]
        csv: PathBuf,

        /// Minimum confidence (0.0 to 1.0).
        #[arg(long = "min-confidence", default_value_t = DEFAULT_MIN_CONFIDENCE)]
        min_confidence: f32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
