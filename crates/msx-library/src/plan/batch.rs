use crate::error::PlanError;
use crate::index::LibraryIndex;
use crate::key::id_of_label;
use std::collections::HashSet;

/// Asset ids a build run should process, lowercased
///
/// With batching enabled, the indexed assets whose id appears in `requested`
/// (whitespace-separated, case-insensitive) in index order. With batching
/// disabled, just the `current` asset.
///
/// # Errors
/// Returns error if batching is disabled and `current` is not indexed
pub fn batch_ids(
    index: &LibraryIndex,
    enabled: bool,
    requested: &str,
    current: &str,
) -> Result<Vec<String>, PlanError> {
    if !enabled {
        let (key, _) = index.lookup(current)?;
        return Ok(vec![id_of_label(key).to_lowercase()]);
    }

    let wanted: HashSet<String> = requested.split_whitespace().map(str::to_lowercase).collect();
    if wanted.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<String> = index
        .keys()
        .map(|k| id_of_label(k).to_lowercase())
        .filter(|id| wanted.contains(id))
        .collect();

    let unknown = wanted.len().saturating_sub(ids.len());
    if unknown > 0 {
        tracing::warn!("{unknown} requested ids are not in the index");
    }
    Ok(ids)
}
