//! Field separator detection for incoming CSV files.
//!
//! Inspects the first few raw lines of a file and counts candidate separator
//! bytes, picking the most frequent one. Quoted fields are not interpreted at
//! this stage; the heuristic only needs to beat the other candidates.

use crate::error::{AdapterError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Separator candidates, in tie-break priority order.
pub const CANDIDATE_SEPARATORS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Number of leading lines examined by default.
pub const DEFAULT_ROWS_TO_CHECK: usize = 3;

/// Detect the field separator used by a CSV file.
///
/// Counts occurrences of each candidate over the first `rows_to_check` lines
/// and returns the candidate with the highest count. Ties are broken by
/// [`CANDIDATE_SEPARATORS`] order. Returns `None` when no candidate occurs at
/// all (single-column files); callers fall back to the target separator so
/// such files still parse.
pub fn detect_separator(path: &Path, rows_to_check: usize) -> Result<Option<u8>> {
    let file =
        File::open(path).map_err(|e| AdapterError::parse(path, format!("cannot open file: {e}")))?;
    let mut reader = BufReader::new(file);

    let mut counts = [0usize; CANDIDATE_SEPARATORS.len()];
    let mut line = Vec::new();

    for _ in 0..rows_to_check {
        line.clear();
        let bytes_read = reader
            .read_until(b'\n', &mut line)
            .map_err(|e| AdapterError::parse(path, format!("cannot read file: {e}")))?;
        if bytes_read == 0 {
            break;
        }
        for (slot, candidate) in counts.iter_mut().zip(CANDIDATE_SEPARATORS) {
            *slot += line.iter().filter(|&&b| b == candidate).count();
        }
    }

    // Strict comparison keeps the first candidate on ties.
    let mut best: Option<(u8, usize)> = None;
    for (candidate, count) in CANDIDATE_SEPARATORS.into_iter().zip(counts) {
        if count > 0 && best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((candidate, count));
        }
    }

    debug!(
        "Detected separator for {}: {:?}",
        path.display(),
        best.map(|(sep, _)| display_separator(sep))
    );

    Ok(best.map(|(separator, _)| separator))
}

/// Render a separator byte for logs and action messages.
pub fn display_separator(separator: u8) -> String {
    match separator {
        b'\t' => "\\t".to_string(),
        other => char::from(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn detect(contents: &str) -> Option<u8> {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{contents}").unwrap();
        detect_separator(temp_file.path(), DEFAULT_ROWS_TO_CHECK).unwrap()
    }

    #[test]
    fn test_detect_semicolon() {
        assert_eq!(detect("mac;hostname\n00:11;web01\n"), Some(b';'));
    }

    #[test]
    fn test_detect_comma() {
        assert_eq!(detect("mac,hostname\n00:11,web01\n"), Some(b','));
    }

    #[test]
    fn test_detect_tab() {
        assert_eq!(detect("mac\thostname\n00:11\tweb01\n"), Some(b'\t'));
    }

    #[test]
    fn test_detect_pipe() {
        assert_eq!(detect("mac|hostname\n00:11|web01\n"), Some(b'|'));
    }

    #[test]
    fn test_majority_wins_over_stray_occurrences() {
        // One semicolon inside a value must not outvote the comma layout.
        assert_eq!(detect("mac,hostname,note\na,b,x;y\nc,d,e\n"), Some(b','));
    }

    #[test]
    fn test_single_column_file_has_no_separator() {
        assert_eq!(detect("hostname\nweb01\nweb02\n"), None);
    }

    #[test]
    fn test_empty_file_has_no_separator() {
        assert_eq!(detect(""), None);
    }

    #[test]
    fn test_only_leading_lines_are_examined() {
        // Separators beyond the checked window are ignored.
        assert_eq!(detect("a;b\nc;d\ne;f\n1,2,3,4,5,6,7,8\n"), Some(b';'));
    }

    #[test]
    fn test_missing_file_is_a_parse_error() {
        let err = detect_separator(Path::new("does-not-exist.csv"), DEFAULT_ROWS_TO_CHECK)
            .unwrap_err();
        assert!(matches!(err, AdapterError::Parse { .. }));
    }

    #[test]
    fn test_display_separator() {
        assert_eq!(display_separator(b';'), ";");
        assert_eq!(display_separator(b'\t'), "\\t");
    }
}
