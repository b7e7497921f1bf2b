//! Queries over `*.history.json` feature history files
//!
//! Each file holds `{ "entries": [ {...}, ... ] }`. Entries are free-form JSON
//! objects; [`fields`] knows which keys carry the feature slug, the capture
//! time and the validity window.
//!
//! # Error Handling Strategy
//!
//! - **Unreadable or invalid JSON files**: a warning on stderr, then the file is skipped
//! - **Documents without an `entries` array**: ignored silently
//! - **Non-object entries**: ignored silently
//! - **Walk failures** other than vanished files: propagated
//!
//! Invalid `--on`/`--from`/`--to` values never reach this module; they are
//! rejected while parsing arguments.

pub mod fields;
pub mod query;

pub use query::{HISTORY_SUFFIX, HistoryMatch, entry_matches, load_entries, query_history};
