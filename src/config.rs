//! Schema configuration loading and validation.
//!
//! The reference header, rename map, and target separator are loaded once per
//! run from a JSON file and passed explicitly into the reconciler and
//! adapter, so multiple configurations can coexist in one process.

use crate::error::{AdapterError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Canonical schema a batch of CSV files is adapted to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Canonical column names, in the order the downstream processor expects
    pub reference_header: Vec<String>,

    /// Observed column name -> canonical column name.
    ///
    /// Insertion order is preserved and drives the order of rename actions in
    /// the log. Entries matching no input column are ignored.
    #[serde(default)]
    pub rename_map: IndexMap<String, String>,

    /// Separator written to every output file
    #[serde(default = "default_target_separator")]
    pub target_separator: char,
}

fn default_target_separator() -> char {
    ';'
}

impl SchemaConfig {
    /// Create a configuration with an empty rename map and the default separator
    pub fn new(reference_header: Vec<String>) -> Self {
        Self {
            reference_header,
            rename_map: IndexMap::new(),
            target_separator: default_target_separator(),
        }
    }

    /// Set the rename map
    pub fn with_rename_map(mut self, rename_map: IndexMap<String, String>) -> Self {
        self.rename_map = rename_map;
        self
    }

    /// Set the target separator
    pub fn with_target_separator(mut self, separator: char) -> Self {
        self.target_separator = separator;
        self
    }

    /// Load and validate a configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AdapterError::configuration(format!(
                "cannot read schema file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Self = serde_json::from_str(&contents).map_err(|e| {
            AdapterError::configuration(format!(
                "invalid schema file '{}': {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        debug!(
            "Loaded schema: {} reference columns, {} rename entries, separator '{}'",
            config.reference_header.len(),
            config.rename_map.len(),
            config.target_separator
        );

        Ok(config)
    }

    /// Validate structural requirements on the configuration
    pub fn validate(&self) -> Result<()> {
        if self.reference_header.is_empty() {
            return Err(AdapterError::configuration(
                "reference header must not be empty",
            ));
        }

        let mut seen = HashSet::new();
        for name in &self.reference_header {
            if name.is_empty() {
                return Err(AdapterError::configuration(
                    "reference header contains an empty column name",
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(AdapterError::configuration(format!(
                    "reference header contains duplicate column '{name}'"
                )));
            }
        }

        if !self.target_separator.is_ascii() {
            return Err(AdapterError::configuration(format!(
                "target separator '{}' must be a single ASCII character",
                self.target_separator
            )));
        }

        Ok(())
    }

    /// Target separator as the byte the CSV reader and writer expect
    pub fn separator_byte(&self) -> u8 {
        self.target_separator as u8
    }
}
