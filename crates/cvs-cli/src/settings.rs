//! Settings file and effective run configuration.
//!
//! Values come from, in order of precedence: command-line flags, the TOML
//! settings file, built-in defaults. The settings file is `--config PATH`
//! when given (it must then exist), otherwise `cvs-survey.toml` in the
//! working directory if present.
//!
//! ```toml
//! mapping_file = "google_forms_mapping.json"
//! output = "CVS_Report.pdf"
//! charts_dir = "charts"
//! title = "Computer Vision Syndrome Survey Report"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use cvs_map::DEFAULT_MAPPING_FILE;
use cvs_report::{DEFAULT_REPORT_FILE, DEFAULT_TITLE, ReportOptions};

/// Settings file looked up in the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "cvs-survey.toml";

/// Contents of the settings file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub mapping_file: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub charts_dir: Option<PathBuf>,
    pub title: Option<String>,
}

impl Settings {
    /// Parses a settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;
        info!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Loads the explicit settings file, or the default one if present.
    ///
    /// A broken default file is reported and ignored; a broken explicit one
    /// is an error.
    pub fn discover(explicit: Option<&Path>, working_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let path = working_dir.join(DEFAULT_SETTINGS_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        match Self::load(&path) {
            Ok(settings) => Ok(settings),
            Err(error) => {
                warn!(error = %format!("{error:#}"), "ignoring settings file, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Flag values that override the settings file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub mapping_file: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub charts_dir: Option<PathBuf>,
    pub title: Option<String>,
}

/// Effective configuration of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub mapping_file: PathBuf,
    pub output: PathBuf,
    pub charts_dir: Option<PathBuf>,
    pub title: String,
}

impl RunConfig {
    pub fn resolve(settings: Settings, overrides: Overrides) -> Self {
        Self {
            mapping_file: overrides
                .mapping_file
                .or(settings.mapping_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MAPPING_FILE)),
            output: overrides
                .output
                .or(settings.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_FILE)),
            charts_dir: overrides.charts_dir.or(settings.charts_dir),
            title: overrides
                .title
                .or(settings.title)
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        }
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions::new(&self.output)
            .with_title(&self.title)
            .with_charts_dir(self.charts_dir.clone())
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::resolve(Settings::default(), Overrides::default())
    }
}
