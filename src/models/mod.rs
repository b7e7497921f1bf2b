//! Data models shared by the pruner, the text search and the history query.
//!
//! - [`RunDirectory`] / [`RetentionPlan`] - one run or deployment folder and its keep/remove split
//! - [`SearchMatch`] / [`FileResult`] / [`SkippedFile`] - text search output
//! - [`HistoryQuery`] / [`TimeRange`] - filters for `*.history.json` entries
//!
//! Nothing here is persisted; every invocation rebuilds these from the filesystem.

pub mod history;
pub mod retention;
pub mod search;

pub use history::{HistoryQuery, TimeRange};
pub use retention::{PruneOutcome, RetentionPlan, RetentionPolicy, RunDirectory};
pub use search::{FileResult, SearchMatch, SearchOptions, SearchReport, SkippedFile};
