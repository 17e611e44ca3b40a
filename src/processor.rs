//! Batch processing engine.
//!
//! Orchestrates one run: file discovery, sequential per-file adaptation with
//! progress reporting, quarantine of files that cannot be adapted, and the
//! run summary. Files are processed one at a time to full completion; there
//! is no shared mutable state between them.

use crate::adapter::FileAdapter;
use crate::config::SchemaConfig;
use crate::error::{AdapterError, Result};
use crate::models::{FileReport, RunSummary};

use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Drives the adaptation of every CSV file in an input directory
pub struct BatchProcessor {
    input_dir: PathBuf,
    output_dir: PathBuf,
    invalid_dir: Option<PathBuf>,
    config: SchemaConfig,
}

impl BatchProcessor {
    /// Create a processor for one input/output directory pair
    pub fn new(input_dir: PathBuf, output_dir: PathBuf, config: SchemaConfig) -> Self {
        Self {
            input_dir,
            output_dir,
            invalid_dir: None,
            config,
        }
    }

    /// Also copy files that cannot be adapted into this directory
    pub fn with_invalid_dir(mut self, invalid_dir: Option<PathBuf>) -> Self {
        self.invalid_dir = invalid_dir;
        self
    }

    /// Adapt every discovered file and write the results.
    ///
    /// Per-file failures are logged, counted, and skipped; the batch
    /// continues. Failures on the output side abort the run, since every
    /// following write would fail the same way.
    pub fn run(&self) -> Result<RunSummary> {
        let start_time = Instant::now();
        let files = self.discover_files()?;

        if files.is_empty() {
            info!("No CSV files found in {}", self.input_dir.display());
            return Ok(RunSummary {
                elapsed: start_time.elapsed(),
                ..Default::default()
            });
        }

        fs::create_dir_all(&self.output_dir)
            .map_err(|e| AdapterError::write(&self.output_dir, e.to_string()))?;

        let adapter = FileAdapter::new(&self.config);
        let progress_bar = new_progress_bar(files.len());
        let mut summary = RunSummary::default();

        for path in &files {
            let file_name = display_name(path);
            progress_bar.set_message(format!("Adapting {file_name}"));

            match adapter.adapt_file(path, &self.output_dir) {
                Ok(report) => {
                    log_report(&report);
                    summary.valid_files.push(report.file_name);
                }
                Err(error) if error.is_fatal() => {
                    progress_bar.abandon_with_message("Run aborted");
                    return Err(error);
                }
                Err(error) => {
                    warn!("Skipping '{}': {}", file_name, error);
                    summary.files_failed += 1;
                    self.quarantine(path, &file_name);
                }
            }
            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("All CSV files processed");
        summary.elapsed = start_time.elapsed();
        Ok(summary)
    }

    /// Report the actions every file would need, writing nothing.
    ///
    /// Files counted as valid are those that would adapt cleanly.
    pub fn check(&self) -> Result<RunSummary> {
        let start_time = Instant::now();
        let files = self.discover_files()?;
        let adapter = FileAdapter::new(&self.config);
        let mut summary = RunSummary::default();

        for path in &files {
            let file_name = display_name(path);
            match adapter.preview_file(path) {
                Ok(report) => {
                    log_report(&report);
                    summary.valid_files.push(report.file_name);
                }
                Err(error) if error.is_fatal() => return Err(error),
                Err(error) => {
                    warn!("Would skip '{}': {}", file_name, error);
                    summary.files_failed += 1;
                }
            }
        }

        summary.elapsed = start_time.elapsed();
        Ok(summary)
    }

    /// Discover input files, sorted by name for deterministic ordering
    fn discover_files(&self) -> Result<Vec<PathBuf>> {
        if !self.input_dir.is_dir() {
            return Err(AdapterError::InputDirNotFound {
                path: self.input_dir.clone(),
            });
        }

        let pattern = self.input_dir.join("*.csv");
        let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
            .map_err(|e| {
                AdapterError::configuration(format!(
                    "invalid file pattern '{}': {}",
                    pattern.display(),
                    e
                ))
            })?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("Skipping unreadable directory entry: {}", e);
                    None
                }
            })
            .collect();
        files.sort();

        debug!(
            "Found {} CSV files in {}",
            files.len(),
            self.input_dir.display()
        );
        Ok(files)
    }

    /// Copy a failed input into the invalid-files directory, if configured.
    ///
    /// Quarantine is advisory; a failure here is logged but never escalated.
    fn quarantine(&self, path: &Path, file_name: &str) {
        let Some(invalid_dir) = &self.invalid_dir else {
            return;
        };

        let result = fs::create_dir_all(invalid_dir)
            .and_then(|_| fs::copy(path, invalid_dir.join(file_name)).map(|_| ()));
        match result {
            Ok(()) => info!(
                "Copied '{}' to '{}'",
                file_name,
                invalid_dir.display()
            ),
            Err(e) => warn!(
                "Failed to copy '{}' to '{}': {}",
                file_name,
                invalid_dir.display(),
                e
            ),
        }
    }
}

fn new_progress_bar(total: usize) -> ProgressBar {
    let progress_bar = ProgressBar::new(total as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    progress_bar
}

fn log_report(report: &FileReport) {
    for action in &report.actions {
        info!("File '{}': {}", report.file_name, action);
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use std::io::Write;
    use tempfile::TempDir;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn write_file(dir: &Path, name: &str, contents: &str) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        write!(file, "{contents}").unwrap();
    }

    fn test_config() -> SchemaConfig {
        let mut rename_map = IndexMap::new();
        rename_map.insert("Host name".to_string(), "hostname".to_string());
        rename_map.insert("MAC".to_string(), "mac".to_string());
        SchemaConfig::new(names(&["mac", "hostname"])).with_rename_map(rename_map)
    }

    #[test]
    fn test_run_over_mixed_directory() {
        let dir = TempDir::new().unwrap();
        let input_dir = dir.path().join("input");
        let output_dir = dir.path().join("output");
        std::fs::create_dir(&input_dir).unwrap();

        write_file(&input_dir, "already.csv", "mac;hostname\n00:11;web01\n");
        write_file(
            &input_dir,
            "messy.csv",
            "Host name,MAC,extra\nweb02,00:22,x\n",
        );
        write_file(&input_dir, "broken.csv", "hostname\nweb03\n");
        write_file(&input_dir, "notes.txt", "not a csv file\n");

        let processor =
            BatchProcessor::new(input_dir.clone(), output_dir.clone(), test_config());
        let summary = processor.run().unwrap();

        // Discovery order is sorted; broken.csv is skipped.
        assert_eq!(summary.valid_files, names(&["already.csv", "messy.csv"]));
        assert_eq!(summary.files_failed, 1);

        assert_eq!(
            std::fs::read_to_string(output_dir.join("already.csv")).unwrap(),
            "mac;hostname\n00:11;web01\n"
        );
        assert_eq!(
            std::fs::read_to_string(output_dir.join("messy.csv")).unwrap(),
            "mac;hostname\n00:22;web02\n"
        );
        assert!(!output_dir.join("broken.csv").exists());
        assert!(!output_dir.join("notes.txt").exists());
    }

    #[test]
    fn test_failed_files_are_quarantined() {
        let dir = TempDir::new().unwrap();
        let input_dir = dir.path().join("input");
        let invalid_dir = dir.path().join("invalid");
        std::fs::create_dir(&input_dir).unwrap();

        write_file(&input_dir, "broken.csv", "hostname\nweb03\n");

        let processor = BatchProcessor::new(
            input_dir.clone(),
            dir.path().join("output"),
            test_config(),
        )
        .with_invalid_dir(Some(invalid_dir.clone()));
        let summary = processor.run().unwrap();

        assert_eq!(summary.files_failed, 1);
        assert_eq!(
            std::fs::read_to_string(invalid_dir.join("broken.csv")).unwrap(),
            "hostname\nweb03\n"
        );
        // The original stays where it was.
        assert!(input_dir.join("broken.csv").exists());
    }

    #[test]
    fn test_empty_input_directory() {
        let dir = TempDir::new().unwrap();
        let input_dir = dir.path().join("input");
        std::fs::create_dir(&input_dir).unwrap();

        let processor =
            BatchProcessor::new(input_dir, dir.path().join("output"), test_config());
        let summary = processor.run().unwrap();

        assert!(summary.valid_files.is_empty());
        assert_eq!(summary.files_failed, 0);
        // No output directory is created for an empty batch.
        assert!(!dir.path().join("output").exists());
    }

    #[test]
    fn test_missing_input_directory_is_fatal() {
        let dir = TempDir::new().unwrap();
        let processor = BatchProcessor::new(
            dir.path().join("nowhere"),
            dir.path().join("output"),
            test_config(),
        );

        let err = processor.run().unwrap_err();
        assert!(matches!(err, AdapterError::InputDirNotFound { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_check_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input_dir = dir.path().join("input");
        let output_dir = dir.path().join("output");
        std::fs::create_dir(&input_dir).unwrap();

        write_file(
            &input_dir,
            "messy.csv",
            "Host name,MAC,extra\nweb02,00:22,x\n",
        );

        let processor =
            BatchProcessor::new(input_dir, output_dir.clone(), test_config());
        let summary = processor.check().unwrap();

        assert_eq!(summary.valid_files, names(&["messy.csv"]));
        assert!(!output_dir.exists());
    }

    #[test]
    fn test_outputs_overwritten_across_runs() {
        let dir = TempDir::new().unwrap();
        let input_dir = dir.path().join("input");
        let output_dir = dir.path().join("output");
        std::fs::create_dir(&input_dir).unwrap();
        std::fs::create_dir(&output_dir).unwrap();

        write_file(&output_dir, "already.csv", "stale contents\n");
        write_file(&input_dir, "already.csv", "mac;hostname\n00:11;web01\n");

        let processor =
            BatchProcessor::new(input_dir, output_dir.clone(), test_config());
        processor.run().unwrap();

        assert_eq!(
            std::fs::read_to_string(output_dir.join("already.csv")).unwrap(),
            "mac;hostname\n00:11;web01\n"
        );
    }
}
