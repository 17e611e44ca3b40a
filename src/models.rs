//! Core data structures for CSV adaptation.
//!
//! Defines the parsed table representations, the per-file transformation
//! plan, the action log used for reporting, and run-level summaries.

use crate::detect::display_separator;
use std::fmt;
use std::time::Duration;

/// One file's parsed tabular content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputTable {
    /// Column names in file order
    pub header: Vec<String>,
    /// Row cells, positionally aligned with the header
    pub rows: Vec<Vec<String>>,
    /// Separator the file was parsed with
    pub separator: u8,
}

/// Table content after plan application, ready for serialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Per-file transformation plan produced by the reconciler.
///
/// Invariant: applying the renames and drops to the input header and
/// reordering the survivors yields exactly `final_order` — same set, same
/// multiplicity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformPlan {
    /// Columns to remove, under their original names, in input-header order
    pub drops: Vec<String>,
    /// Rename pairs (old name, canonical name), in rename-map declaration order
    pub renames: Vec<(String, String)>,
    /// Final column sequence; always equals the reference header
    pub final_order: Vec<String>,
    /// Input header already equals the reference header exactly
    pub already_aligned: bool,
}

/// One recorded change made while adapting a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ColumnDropped(String),
    ColumnRenamed { from: String, to: String },
    ColumnsRearranged,
    SeparatorChanged { from: u8, to: u8 },
    AlreadyCorrect,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::ColumnDropped(name) => write!(f, "Column '{name}' dropped."),
            Action::ColumnRenamed { from, to } => {
                write!(f, "Column '{from}' renamed to '{to}'.")
            }
            Action::ColumnsRearranged => write!(f, "Columns rearranged."),
            Action::SeparatorChanged { from, to } => {
                write!(
                    f,
                    "Separator '{}' changed to '{}'.",
                    display_separator(*from),
                    display_separator(*to)
                )
            }
            Action::AlreadyCorrect => write!(f, "File already has the correct format."),
        }
    }
}

/// Ordered record of what changed for one file
pub type ActionLog = Vec<Action>;

/// Outcome of adapting a single file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub file_name: String,
    pub actions: ActionLog,
}

/// Aggregate results for one run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Successfully adapted files, in discovery order
    pub valid_files: Vec<String>,
    /// Files skipped because of parse or schema failures
    pub files_failed: usize,
    /// Total wall-clock time
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_messages() {
        assert_eq!(
            Action::ColumnDropped("extra".to_string()).to_string(),
            "Column 'extra' dropped."
        );
        assert_eq!(
            Action::ColumnRenamed {
                from: "Host name".to_string(),
                to: "hostname".to_string(),
            }
            .to_string(),
            "Column 'Host name' renamed to 'hostname'."
        );
        assert_eq!(Action::ColumnsRearranged.to_string(), "Columns rearranged.");
        assert_eq!(
            Action::SeparatorChanged {
                from: b',',
                to: b';'
            }
            .to_string(),
            "Separator ',' changed to ';'."
        );
        assert_eq!(
            Action::AlreadyCorrect.to_string(),
            "File already has the correct format."
        );
    }

    #[test]
    fn test_tab_separator_is_escaped_in_messages() {
        let action = Action::SeparatorChanged {
            from: b'\t',
            to: b';',
        };
        assert_eq!(action.to_string(), "Separator '\\t' changed to ';'.");
    }
}
