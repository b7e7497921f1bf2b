//! Output formatting for the `search` command.
//!
//! The JSON payload always carries every match; the per-file limit only
//! applies to the human-readable listing.

use std::io::{self, Write};

use anyhow::Result;
use serde::Serialize;

use crate::models::{SearchMatch, SearchOptions, SearchReport};
use crate::utils::{format_iso_millis, sanitize_for_terminal};

#[derive(Serialize)]
struct FileEntry<'a> {
    path: &'a str,
    matches: &'a [SearchMatch],
    skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    mtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

#[derive(Serialize)]
struct SearchPayload<'a> {
    query: &'a str,
    options: &'a SearchOptions,
    results: Vec<FileEntry<'a>>,
    skipped: Vec<FileEntry<'a>>,
}

/// Pretty-printed JSON document with the query, options, all results and skips
pub fn search_json(query: &str, options: &SearchOptions, report: &SearchReport) -> Result<String> {
    let payload = SearchPayload {
        query,
        options,
        results: report
            .results
            .iter()
            .map(|result| FileEntry {
                path: &result.path,
                matches: &result.matches,
                skipped: false,
                mtime: Some(format_iso_millis(&result.modified)),
                reason: None,
            })
            .collect(),
        skipped: report
            .skipped
            .iter()
            .map(|skipped| FileEntry {
                path: &skipped.path,
                matches: &[],
                skipped: true,
                mtime: None,
                reason: Some(&skipped.reason),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&payload)?)
}

/// Matching files with up to `limit` lines each, then a count of the rest
pub fn write_search_results<W: Write>(
    out: &mut W,
    report: &SearchReport,
    limit: usize,
) -> io::Result<()> {
    for result in &report.results {
        writeln!(
            out,
            "{} (last updated {})",
            sanitize_for_terminal(&result.path),
            format_iso_millis(&result.modified)
        )?;
        for m in result.matches.iter().take(limit) {
            writeln!(out, "  L{}: {}", m.line, sanitize_for_terminal(&m.text))?;
        }
        if result.matches.len() > limit {
            let remaining = result.matches.len() - limit;
            let noun = if remaining == 1 { "match" } else { "matches" };
            writeln!(out, "  ... {} more {} in this file", remaining, noun)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// `Skipped files:` followed by one line per skipped file; nothing if none
pub fn write_skipped<W: Write>(out: &mut W, report: &SearchReport) -> io::Result<()> {
    if report.skipped.is_empty() {
        return Ok(());
    }
    writeln!(out, "Skipped files:")?;
    for skipped in &report.skipped {
        writeln!(out, "  {} - {}", sanitize_for_terminal(&skipped.path), skipped.reason)?;
    }
    Ok(())
}
