//! Workbench Ops - housekeeping and lookup tools for a development workbench
//!
//! This library backs the `workbench-ops` binary. It works on a workspace root
//! that holds `state/runs` (run archives), `state/cd` (deployment records) and
//! `research/` (notes). It supports:
//!
//! - Pruning old run archives and deployment records under keep-count / keep-age
//!   rules, with promoted runs always retained
//! - Plain-text line search across research documents
//! - Querying `*.history.json` files by feature slug and time window
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! use workbench_ops::search::{TextQuery, search_documents};
//! use workbench_ops::utils::Workspace;
//!
//! let workspace = Workspace::new(PathBuf::from("/srv/workbench"));
//! let query = TextQuery::new("retention", false);
//! let report = search_documents(&workspace.research_dir(), &workspace, &query, 2 * 1024 * 1024)?;
//! println!("{} files matched", report.results.len());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod history;
pub mod models;
pub mod retention;
pub mod search;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use history::query_history;
pub use models::{HistoryQuery, RetentionPlan, RetentionPolicy, RunDirectory, SearchReport};
pub use retention::{plan_retention, prune_root};
pub use search::search_documents;
pub use utils::Workspace;
