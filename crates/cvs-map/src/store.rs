//! Persistence for the column mapping.
//!
//! The mapping lifecycle is owned by a [`MappingStore`] passed into the
//! pipeline rather than by a global file path:
//!
//! - `load` returns `None` until a mapping has been saved;
//! - `save` rewrites the whole mapping, replacing any previous one;
//! - `reset` deletes it, after which `load` returns `None` again.
//!
//! # Storage Format
//!
//! [`JsonFileStore`] writes a flat, pretty-printed JSON object mapping each
//! source column to its canonical field name:
//!
//! ```json
//! {
//!   "Timestamp": "timestamp",
//!   "How many hours do you spend on screens for school?": "hours_academic"
//! }
//! ```
//!
//! Reads and writes are not locked; the store is meant for a single operator.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use cvs_model::ColumnMapping;

/// Default file name of the persisted mapping.
pub const DEFAULT_MAPPING_FILE: &str = "google_forms_mapping.json";

/// Load/save/reset access to the persisted column mapping.
pub trait MappingStore {
    /// Returns the stored mapping, or `None` when no mapping exists.
    fn load(&self) -> Result<Option<ColumnMapping>>;

    /// Stores `mapping`, unconditionally replacing any previous mapping.
    fn save(&mut self, mapping: &ColumnMapping) -> Result<()>;

    /// Deletes the stored mapping. Returns `true` if one existed.
    fn reset(&mut self) -> Result<bool>;

    /// Human-readable location, for messages.
    fn describe(&self) -> String;
}

/// Mapping stored as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAPPING_FILE)
    }
}

impl MappingStore for JsonFileStore {
    fn load(&self) -> Result<Option<ColumnMapping>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read mapping from {}", self.path.display()))?;
        let mapping: ColumnMapping = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse mapping from {}", self.path.display()))?;
        debug!(path = %self.path.display(), entries = mapping.len(), "mapping loaded");
        Ok(Some(mapping))
    }

    fn save(&mut self, mapping: &ColumnMapping) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create mapping directory: {}", parent.display())
            })?;
        }
        let json = serde_json::to_string_pretty(mapping).context("Failed to serialize mapping")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write mapping to {}", self.path.display()))?;
        debug!(path = %self.path.display(), entries = mapping.len(), "mapping saved");
        Ok(())
    }

    fn reset(&mut self) -> Result<bool> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to delete mapping: {}", self.path.display()))?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-process store; nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    mapping: Option<ColumnMapping>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mapping(mapping: ColumnMapping) -> Self {
        Self {
            mapping: Some(mapping),
        }
    }
}

impl MappingStore for MemoryStore {
    fn load(&self) -> Result<Option<ColumnMapping>> {
        Ok(self.mapping.clone())
    }

    fn save(&mut self, mapping: &ColumnMapping) -> Result<()> {
        self.mapping = Some(mapping.clone());
        Ok(())
    }

    fn reset(&mut self) -> Result<bool> {
        Ok(self.mapping.take().is_some())
    }

    fn describe(&self) -> String {
        "in-memory mapping".to_string()
    }
}

#[cfg(test)]
mod tests {
    use cvs_model::CanonicalField;

    use super::*;

    #[test]
    fn memory_store_lifecycle() {
        let mut store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());

        let mut mapping = ColumnMapping::new();
        mapping.insert("Age?", CanonicalField::Age).unwrap();
        store.save(&mapping).unwrap();
        assert_eq!(store.load().unwrap(), Some(mapping));

        assert!(store.reset().unwrap());
        assert!(!store.reset().unwrap());
        assert!(store.load().unwrap().is_none());
    }
}
