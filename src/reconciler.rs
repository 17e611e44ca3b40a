//! Header reconciliation against the reference schema.
//!
//! Pure logic: given an input header, the reference header, and the rename
//! map, compute which columns to drop, which to rename, and the final column
//! order. No file I/O happens here.

use crate::error::{AdapterError, Result};
use crate::models::TransformPlan;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Compute the transformation plan for one input header.
///
/// Matching is case-sensitive and exact; rename-map entries that match no
/// input column are ignored. Fails with [`AdapterError::DuplicateColumn`]
/// when the input header repeats a name (before or after renaming) and with
/// [`AdapterError::SchemaMismatch`] when the input lacks reference columns.
pub fn reconcile(
    input_header: &[String],
    reference_header: &[String],
    rename_map: &IndexMap<String, String>,
) -> Result<TransformPlan> {
    let mut seen = HashSet::new();
    for name in input_header {
        if !seen.insert(name.as_str()) {
            return Err(AdapterError::DuplicateColumn {
                column: name.clone(),
            });
        }
    }

    let reference_set: HashSet<&str> = reference_header.iter().map(String::as_str).collect();

    // Apply the rename map; names it does not know pass through unchanged.
    let mapped: Vec<&str> = input_header
        .iter()
        .map(|name| rename_map.get(name).unwrap_or(name).as_str())
        .collect();

    // Two input columns landing on the same canonical name would duplicate a
    // retained column. Collisions among dropped names are harmless.
    let mut seen_canonical = HashSet::new();
    for name in &mapped {
        if reference_set.contains(name) && !seen_canonical.insert(*name) {
            return Err(AdapterError::DuplicateColumn {
                column: (*name).to_string(),
            });
        }
    }

    let drops: Vec<String> = input_header
        .iter()
        .zip(&mapped)
        .filter(|(_, mapped_name)| !reference_set.contains(**mapped_name))
        .map(|(original, _)| original.clone())
        .collect();

    let mapped_set: HashSet<&str> = mapped.iter().copied().collect();
    let missing: Vec<String> = reference_header
        .iter()
        .filter(|name| !mapped_set.contains(name.as_str()))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(AdapterError::SchemaMismatch { missing });
    }

    let input_set: HashSet<&str> = input_header.iter().map(String::as_str).collect();
    let renames: Vec<(String, String)> = rename_map
        .iter()
        .filter(|(alias, canonical)| {
            alias != canonical
                && input_set.contains(alias.as_str())
                && reference_set.contains(canonical.as_str())
        })
        .map(|(alias, canonical)| (alias.clone(), canonical.clone()))
        .collect();

    let already_aligned =
        drops.is_empty() && renames.is_empty() && input_header == reference_header;

    Ok(TransformPlan {
        drops,
        renames,
        final_order: reference_header.to_vec(),
        already_aligned,
    })
}
