//! File adaptation: applying a transformation plan to one CSV file.
//!
//! Parses a file with its detected separator, applies the reconciler's plan
//! to the rows, and re-emits the table with the target separator. Files that
//! already match the reference schema and separator are copied byte-for-byte
//! so output stays identical to input.

use crate::config::SchemaConfig;
use crate::detect::{DEFAULT_ROWS_TO_CHECK, detect_separator};
use crate::error::{AdapterError, Result};
use crate::models::{Action, ActionLog, FileReport, InputTable, OutputTable, TransformPlan};
use crate::reconciler::reconcile;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Adapts individual CSV files to a schema configuration
pub struct FileAdapter<'a> {
    config: &'a SchemaConfig,
}

impl<'a> FileAdapter<'a> {
    /// Create an adapter bound to one schema configuration
    pub fn new(config: &'a SchemaConfig) -> Self {
        Self { config }
    }

    /// Adapt one file and write the result as `<output_dir>/<file name>`.
    ///
    /// The input file is never modified. Exactly one output file is produced:
    /// a verbatim copy when nothing needs to change, a re-serialized table
    /// otherwise.
    pub fn adapt_file(&self, input_path: &Path, output_dir: &Path) -> Result<FileReport> {
        let file_name = file_name_of(input_path)?;
        let (output, actions) = self.prepare(input_path)?;

        let output_path = output_dir.join(&file_name);
        if matches!(actions.as_slice(), [Action::AlreadyCorrect]) {
            fs::copy(input_path, &output_path)
                .map_err(|e| AdapterError::write(&output_path, e.to_string()))?;
        } else {
            write_table(&output, self.config.separator_byte(), &output_path)?;
        }

        debug!(
            "Adapted '{}' with {} actions",
            file_name,
            actions.len()
        );

        Ok(FileReport { file_name, actions })
    }

    /// Compute the actions one file would need, without writing anything
    pub fn preview_file(&self, input_path: &Path) -> Result<FileReport> {
        let file_name = file_name_of(input_path)?;
        let (_, actions) = self.prepare(input_path)?;
        Ok(FileReport { file_name, actions })
    }

    /// Parse, reconcile, and transform one file in memory
    fn prepare(&self, input_path: &Path) -> Result<(OutputTable, ActionLog)> {
        let separator = detect_separator(input_path, DEFAULT_ROWS_TO_CHECK)?
            .unwrap_or_else(|| self.config.separator_byte());
        let table = parse_table(input_path, separator)?;

        let plan = reconcile(
            &table.header,
            &self.config.reference_header,
            &self.config.rename_map,
        )?;

        Ok(adapt(&table, &plan, self.config.separator_byte()))
    }
}

/// Apply a transformation plan to parsed table content.
///
/// Each step runs and logs only when it changes something; when no step
/// changes anything the log holds the single already-correct entry.
pub fn adapt(
    table: &InputTable,
    plan: &TransformPlan,
    target_separator: u8,
) -> (OutputTable, ActionLog) {
    let mut actions = Vec::new();
    let mut header = table.header.clone();
    let mut rows = table.rows.clone();

    for name in &plan.drops {
        if let Some(index) = header.iter().position(|column| column == name) {
            header.remove(index);
            for row in &mut rows {
                row.remove(index);
            }
            actions.push(Action::ColumnDropped(name.clone()));
        }
    }

    for (from, to) in &plan.renames {
        if let Some(index) = header.iter().position(|column| column == from) {
            header[index] = to.clone();
            actions.push(Action::ColumnRenamed {
                from: from.clone(),
                to: to.clone(),
            });
        }
    }

    if header != plan.final_order {
        let index_of: HashMap<&str, usize> = header
            .iter()
            .enumerate()
            .map(|(index, name)| (name.as_str(), index))
            .collect();
        let permutation: Vec<usize> = plan
            .final_order
            .iter()
            .map(|name| index_of[name.as_str()])
            .collect();

        rows = rows
            .into_iter()
            .map(|row| permutation.iter().map(|&index| row[index].clone()).collect())
            .collect();
        header = plan.final_order.clone();
        actions.push(Action::ColumnsRearranged);
    }

    if table.separator != target_separator {
        actions.push(Action::SeparatorChanged {
            from: table.separator,
            to: target_separator,
        });
    }

    if actions.is_empty() {
        actions.push(Action::AlreadyCorrect);
    }

    (OutputTable { header, rows }, actions)
}

/// Parse one CSV file into memory with the given separator
pub fn parse_table(path: &Path, separator: u8) -> Result<InputTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(separator)
        .has_headers(true)
        .flexible(false)
        .from_path(path)
        .map_err(|e| AdapterError::parse(path, e.to_string()))?;

    let header: Vec<String> = reader
        .headers()
        .map_err(|e| AdapterError::parse(path, e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    if header.is_empty() || header.iter().all(|name| name.is_empty()) {
        return Err(AdapterError::parse(path, "file has no header row"));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AdapterError::parse(path, e.to_string()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(InputTable {
        header,
        rows,
        separator,
    })
}

/// Serialize a table with the given separator
fn write_table(table: &OutputTable, separator: u8, path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(separator)
        .from_path(path)
        .map_err(|e| AdapterError::write(path, e.to_string()))?;

    writer
        .write_record(&table.header)
        .map_err(|e| AdapterError::write(path, e.to_string()))?;
    for row in &table.rows {
        writer
            .write_record(row)
            .map_err(|e| AdapterError::write(path, e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| AdapterError::write(path, e.to_string()))?;

    Ok(())
}

fn file_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| AdapterError::parse(path, "path has no usable file name"))
}
