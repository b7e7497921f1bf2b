use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::utils::timestamp_from_value;

/// Feature identifier keys in priority order; the first is canonical
pub const FEATURE_FIELDS: [&str; 3] = ["featureSlug", "featureId", "feature"];
pub const CANONICAL_FEATURE_FIELD: &str = FEATURE_FIELDS[0];

/// Capture timestamp keys in priority order (the validity start is the last resort)
pub const CAPTURE_FIELDS: [&str; 3] = ["capturedAt", "timestamp", "recordedAt"];

pub const VALIDITY_FIELD: &str = "validity";
pub const VALIDITY_START_FIELD: &str = "start";
pub const VALIDITY_END_FIELDS: [&str; 2] = ["end", "until"];

/// Annotation naming the file an entry came from
pub const SOURCE_PATH_FIELD: &str = "sourcePath";

fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First non-empty feature identifier (strings, or numbers rendered as text)
pub fn feature_slug(entry: &Map<String, Value>) -> Option<String> {
    FEATURE_FIELDS.iter().find_map(|key| entry.get(*key).and_then(identifier))
}

/// Whether the canonical `featureSlug` key holds a usable identifier
pub fn has_canonical_slug(entry: &Map<String, Value>) -> bool {
    entry.get(CANONICAL_FEATURE_FIELD).and_then(identifier).is_some()
}

fn validity(entry: &Map<String, Value>) -> Option<&Map<String, Value>> {
    entry.get(VALIDITY_FIELD)?.as_object()
}

pub fn validity_start(entry: &Map<String, Value>) -> Option<DateTime<Utc>> {
    validity(entry)?.get(VALIDITY_START_FIELD).and_then(timestamp_from_value)
}

/// End of the validity window (`end`, else `until`); `None` means open-ended
pub fn validity_end(entry: &Map<String, Value>) -> Option<DateTime<Utc>> {
    let window = validity(entry)?;
    VALIDITY_END_FIELDS.iter().find_map(|key| window.get(*key).and_then(timestamp_from_value))
}

/// First present and parseable capture field, falling back to the validity start
pub fn capture_time(entry: &Map<String, Value>) -> Option<DateTime<Utc>> {
    CAPTURE_FIELDS
        .iter()
        .find_map(|key| entry.get(*key).and_then(timestamp_from_value))
        .or_else(|| validity_start(entry))
}

/// Whether `point` falls inside the entry's validity window, bounds inclusive
///
/// The window starts at the validity start or, failing that, the capture
/// time. An entry with neither never matches.
pub fn valid_at(entry: &Map<String, Value>, point: &DateTime<Utc>) -> bool {
    let Some(start) = validity_start(entry).or_else(|| capture_time(entry)) else {
        return false;
    };
    if *point < start {
        return false;
    }
    validity_end(entry).is_none_or(|end| *point <= end)
}
