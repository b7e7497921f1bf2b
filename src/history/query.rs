use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::history::fields::{
    CANONICAL_FEATURE_FIELD, SOURCE_PATH_FIELD, capture_time, feature_slug, has_canonical_slug,
    valid_at,
};
use crate::models::HistoryQuery;
use crate::utils::{Workspace, document_files};

/// File name suffix of feature history documents
pub const HISTORY_SUFFIX: &str = ".history.json";

/// A matching entry ready for output, with the key it sorts by
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryMatch {
    pub sort_key: DateTime<Utc>,
    pub entry: Value,
}

fn is_history_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(HISTORY_SUFFIX))
}

/// Read the `entries` array of one history document
///
/// Returns an empty Vec when the document has no `entries` array, and drops
/// array elements that are not objects.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON.
pub fn load_entries(path: &Path) -> Result<Vec<Map<String, Value>>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read history file: {}", path.display()))?;
    let document: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse history file: {}", path.display()))?;

    let Some(Value::Array(entries)) = document.get("entries") else {
        debug!("{} has no entries array, ignoring", path.display());
        return Ok(Vec::new());
    };

    Ok(entries.iter().filter_map(|entry| entry.as_object().cloned()).collect())
}

/// Apply the feature, range and point-in-time filters to one entry
pub fn entry_matches(entry: &Map<String, Value>, query: &HistoryQuery) -> bool {
    if let Some(wanted) = &query.feature
        && feature_slug(entry).as_deref() != Some(wanted.as_str())
    {
        return false;
    }

    if query.range.is_active() {
        match capture_time(entry) {
            Some(captured) if query.range.contains(&captured) => {}
            _ => return false,
        }
    }

    if let Some(point) = &query.on
        && !valid_at(entry, point)
    {
        return false;
    }

    true
}

fn annotate(mut entry: Map<String, Value>, source: &str) -> Map<String, Value> {
    if !has_canonical_slug(&entry)
        && let Some(slug) = feature_slug(&entry)
    {
        entry.insert(CANONICAL_FEATURE_FIELD.to_string(), Value::String(slug));
    }
    entry.insert(SOURCE_PATH_FIELD.to_string(), Value::String(source.to_string()));
    entry
}

// capture_time already falls back to the validity start
fn sort_key(entry: &Map<String, Value>) -> DateTime<Utc> {
    capture_time(entry).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Collect matching entries from every `*.history.json` under `docs_root`
///
/// Matches are owned copies of the source entries, annotated with
/// `sourcePath` (relative to the workspace root) and, when it was resolved
/// from another key, `featureSlug`. The result is sorted newest first.
///
/// # Errors
///
/// Only walk failures propagate; unreadable or malformed files are skipped
/// with a warning.
pub fn query_history(
    docs_root: &Path,
    workspace: &Workspace,
    query: &HistoryQuery,
) -> Result<Vec<HistoryMatch>> {
    let mut matches = Vec::new();

    for path in document_files(docs_root) {
        let path = path?;
        if !is_history_file(&path) {
            continue;
        }

        let entries = match load_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Skipping {}: {:#}", path.display(), e);
                continue;
            }
        };

        let source = workspace.relative(&path);
        for entry in entries.into_iter().filter(|entry| entry_matches(entry, query)) {
            let entry = annotate(entry, &source);
            matches.push(HistoryMatch { sort_key: sort_key(&entry), entry: Value::Object(entry) });
        }
    }

    // Stable: equal keys keep file and array order
    matches.sort_by(|a, b| b.sort_key.cmp(&a.sort_key));
    Ok(matches)
}
