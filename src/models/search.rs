use chrono::{DateTime, Utc};
use serde::Serialize;

/// One matching line (1-based line number, trimmed text)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub line: usize,
    pub text: String,
}

/// A document with at least one matching line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResult {
    /// Path relative to the workspace root
    pub path: String,
    pub matches: Vec<SearchMatch>,
    pub modified: DateTime<Utc>,
}

/// A document that was not scanned, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// Effective options echoed back in the JSON payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    pub limit: usize,
    pub case_sensitive: bool,
    pub json: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchReport {
    pub results: Vec<FileResult>,
    pub skipped: Vec<SkippedFile>,
    /// Number of documents the walk produced, matched or not
    pub files_seen: usize,
}

impl SearchReport {
    pub fn has_matches(&self) -> bool {
        !self.results.is_empty()
    }
}
