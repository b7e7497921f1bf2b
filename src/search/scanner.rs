use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::models::{FileResult, SearchMatch, SearchReport, SkippedFile};
use crate::utils::{Workspace, document_files};

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// A substring needle, case-folded unless case-sensitive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextQuery {
    needle: String,
    case_sensitive: bool,
}

impl TextQuery {
    pub fn new(query: &str, case_sensitive: bool) -> Self {
        let needle = if case_sensitive { query.to_string() } else { query.to_lowercase() };
        Self { needle, case_sensitive }
    }

    pub fn is_match(&self, line: &str) -> bool {
        if self.case_sensitive {
            line.contains(&self.needle)
        } else {
            line.to_lowercase().contains(&self.needle)
        }
    }

    /// Every matching line of `content`, split on `\n` or `\r\n`
    ///
    /// # Examples
    ///
    /// ```
    /// use workbench_ops::search::TextQuery;
    ///
    /// let query = TextQuery::new("hello", false);
    /// let matches = query.find_matches("intro\r\n  Hello World  \nbye");
    /// assert_eq!(matches.len(), 1);
    /// assert_eq!(matches[0].line, 2);
    /// assert_eq!(matches[0].text, "Hello World");
    /// ```
    pub fn find_matches(&self, content: &str) -> Vec<SearchMatch> {
        content
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .enumerate()
            .filter(|(_, line)| self.is_match(line))
            .map(|(idx, line)| SearchMatch { line: idx + 1, text: line.trim().to_string() })
            .collect()
    }
}

/// What happened to a single document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Matched(FileResult),
    Skipped(SkippedFile),
    NoMatch,
    /// Removed between the walk and the stat
    Vanished,
}

fn format_mib(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / BYTES_PER_MIB)
}

/// Scan one file for `query`
///
/// `display_path` is the path reported in results and skip reasons.
///
/// # Errors
///
/// Returns an error if the file cannot be stat'ed for any reason other than
/// having been removed.
pub fn scan_file(
    path: &Path,
    display_path: String,
    query: &TextQuery,
    max_file_bytes: u64,
) -> Result<ScanOutcome> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ScanOutcome::Vanished),
        Err(e) => return Err(e).with_context(|| format!("Failed to stat {}", path.display())),
    };
    // Symlinked directories are not followed by the walk
    if metadata.is_dir() {
        return Ok(ScanOutcome::NoMatch);
    }

    if metadata.len() > max_file_bytes {
        return Ok(ScanOutcome::Skipped(SkippedFile {
            path: display_path,
            reason: format!("size {} MiB exceeds limit", format_mib(metadata.len())),
        }));
    }

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            return Ok(ScanOutcome::Skipped(SkippedFile {
                path: display_path,
                reason: format!("unable to read: {}", e),
            }));
        }
    };
    let content = match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(e) => {
            return Ok(ScanOutcome::Skipped(SkippedFile {
                path: display_path,
                reason: format!("unable to read as utf8: {}", e.utf8_error()),
            }));
        }
    };

    let matches = query.find_matches(&content);
    if matches.is_empty() {
        return Ok(ScanOutcome::NoMatch);
    }

    let modified: DateTime<Utc> = metadata
        .modified()
        .with_context(|| format!("Failed to read modification time: {}", path.display()))?
        .into();
    Ok(ScanOutcome::Matched(FileResult { path: display_path, matches, modified }))
}

/// Search every non-hidden file under `docs_root`
///
/// Paths in the report are relative to the workspace root. Results keep walk
/// order (file-name order per directory).
///
/// # Errors
///
/// Propagates walk failures other than vanished entries and stat failures
/// from [`scan_file`].
pub fn search_documents(
    docs_root: &Path,
    workspace: &Workspace,
    query: &TextQuery,
    max_file_bytes: u64,
) -> Result<SearchReport> {
    let mut report = SearchReport::default();

    for path in document_files(docs_root) {
        let path = path?;
        report.files_seen += 1;

        match scan_file(&path, workspace.relative(&path), query, max_file_bytes)? {
            ScanOutcome::Matched(result) => {
                debug!("{}: {} matching lines", result.path, result.matches.len());
                report.results.push(result);
            }
            ScanOutcome::Skipped(skipped) => report.skipped.push(skipped),
            ScanOutcome::NoMatch => {}
            ScanOutcome::Vanished => {
                warn!("Skipping {}: removed before it could be read", path.display());
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn write(dir: &Path, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_query_is_case_insensitive_by_default() {
        let query = TextQuery::new("hello", false);
        assert!(query.is_match("Hello World"));
        assert!(query.is_match("HELLO"));
    }

    #[test]
    fn test_query_case_sensitive() {
        let query = TextQuery::new("hello", true);
        assert!(!query.is_match("Hello World"));
        assert!(query.is_match("say hello"));
    }

    #[test]
    fn test_query_uppercase_needle_folds() {
        let query = TextQuery::new("WORLD", false);
        assert!(query.is_match("hello world"));
    }

    #[test]
    fn test_find_matches_numbers_lines_from_one() {
        let query = TextQuery::new("x", false);
        let matches = query.find_matches("x first\nnone\r\n   x third   \n");
        assert_eq!(
            matches,
            vec![
                SearchMatch { line: 1, text: "x first".to_string() },
                SearchMatch { line: 3, text: "x third".to_string() },
            ]
        );
    }

    #[test]
    fn test_find_matches_handles_crlf_only_once() {
        let query = TextQuery::new("end", false);
        let matches = query.find_matches("a\r\nthe end\r\n");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].line, 2);
        assert_eq!(matches[0].text, "the end");
    }

    #[test]
    fn test_scan_file_oversized_is_skipped_without_reading() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "big.md", &vec![b'a'; 3 * 1024 * 1024]);

        let query = TextQuery::new("a", false);
        let outcome = scan_file(&path, "big.md".into(), &query, 2 * 1024 * 1024).unwrap();
        match outcome {
            ScanOutcome::Skipped(skipped) => {
                assert_eq!(skipped.path, "big.md");
                assert_eq!(skipped.reason, "size 3.00 MiB exceeds limit");
            }
            other => panic!("expected skip, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_file_invalid_utf8_is_skipped() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "blob.bin", &[0xff, 0xfe, b'h', b'i']);

        let query = TextQuery::new("hi", false);
        let outcome = scan_file(&path, "blob.bin".into(), &query, 1024).unwrap();
        match outcome {
            ScanOutcome::Skipped(skipped) => {
                assert!(skipped.reason.starts_with("unable to read as utf8"));
            }
            other => panic!("expected skip, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_file_without_matches() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "a.md", b"nothing here");

        let query = TextQuery::new("absent", false);
        assert_eq!(scan_file(&path, "a.md".into(), &query, 1024).unwrap(), ScanOutcome::NoMatch);
    }

    #[test]
    fn test_scan_file_vanished() {
        let temp = TempDir::new().unwrap();
        let query = TextQuery::new("x", false);
        let outcome = scan_file(&temp.path().join("gone.md"), "gone.md".into(), &query, 1024);
        assert_eq!(outcome.unwrap(), ScanOutcome::Vanished);
    }

    #[test]
    fn test_search_documents_collects_results_and_skips() {
        let temp = TempDir::new().unwrap();
        let docs = temp.path().join("research");
        fs::create_dir_all(docs.join("nested")).unwrap();
        write(&docs, "a.md", b"Retention policy\nother");
        write(&docs.join("nested"), "b.md", b"no hit");
        write(&docs.join("nested"), "c.md", b"RETENTION again");
        write(&docs, ".hidden.md", b"retention hidden");
        write(&docs, "large.md", &vec![b'r'; 64]);

        let workspace = Workspace::new(temp.path().to_path_buf());
        let query = TextQuery::new("retention", false);
        let report = search_documents(&docs, &workspace, &query, 32).unwrap();

        assert_eq!(report.files_seen, 4);
        let paths: Vec<&str> = report.results.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["research/a.md", "research/nested/c.md"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path, "research/large.md");
        assert!(report.has_matches());
    }

    #[test]
    fn test_search_documents_missing_root() {
        let temp = TempDir::new().unwrap();
        let workspace = Workspace::new(temp.path().to_path_buf());
        let query = TextQuery::new("x", false);

        let report =
            search_documents(&temp.path().join("research"), &workspace, &query, 1024).unwrap();
        assert_eq!(report.files_seen, 0);
        assert!(!report.has_matches());
    }
}
