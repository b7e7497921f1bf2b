//! Retention pruning for run archives and deployment records
//!
//! # Policy
//!
//! Candidates (immediate subdirectories of a root) are ordered newest first by
//! modification time. An entry is kept when it is promoted, or when it is among
//! the first `keep_count` entries **and** no older than `keep_days`. Everything
//! else is deleted.
//!
//! # Error Handling Strategy
//!
//! - **Missing root**: an empty result, not an error (first run, nothing archived yet)
//! - **Entry vanished between listing and stat**: logged and skipped
//! - **Listing or probe failure** (permissions, disk errors): propagated, aborting the run
//! - **Deletion failure**: logged per entry. The remaining entries are still
//!   attempted, and so is the next root. The failures are reported through
//!   [`PruneOutcome::ensure_complete`]
//!
//! [`PruneOutcome::ensure_complete`]: crate::models::PruneOutcome::ensure_complete

pub mod planner;
pub mod pruner;
pub mod scan;

pub use planner::plan_retention;
pub use pruner::{
    PruneTarget, prune_root, prune_root_with, prune_targets, prune_targets_with, remove_tree,
};
pub use scan::{PROMOTION_MARKER, PromotionCheck, scan_candidates};
