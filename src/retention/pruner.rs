use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::models::{PruneOutcome, RetentionPolicy};
use crate::retention::planner::plan_retention;
use crate::retention::scan::{PromotionCheck, scan_candidates};
use crate::utils::Workspace;

/// One root to prune and how to detect promoted entries under it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneTarget {
    pub root: PathBuf,
    pub promotion: PromotionCheck,
}

impl PruneTarget {
    /// Run archives (promoted by an inner `prod` marker) followed by deployment records
    pub fn workspace_defaults(workspace: &Workspace) -> Vec<Self> {
        vec![
            Self { root: workspace.runs_dir(), promotion: PromotionCheck::inner_marker() },
            Self { root: workspace.deployments_dir(), promotion: PromotionCheck::Disabled },
        ]
    }
}

/// Recursively delete a directory tree; a tree that is already gone counts as removed
pub fn remove_tree(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Scan, plan and delete for one root
///
/// Each deletion is attempted independently: a failure is logged and
/// recorded in [`PruneOutcome::failed`] without stopping the others.
///
/// # Errors
///
/// Returns an error only when the scan fails (see [`scan_candidates`]). Deletion
/// failures are reported through the outcome.
pub fn prune_root(
    target: &PruneTarget,
    policy: &RetentionPolicy,
    now: DateTime<Utc>,
) -> Result<PruneOutcome> {
    prune_root_with(target, policy, now, remove_tree)
}

/// [`prune_root`] with the deletion step supplied by the caller
pub fn prune_root_with<F>(
    target: &PruneTarget,
    policy: &RetentionPolicy,
    now: DateTime<Utc>,
    remove: F,
) -> Result<PruneOutcome>
where
    F: Fn(&Path) -> io::Result<()>,
{
    let candidates = scan_candidates(&target.root, &target.promotion)?;
    let plan = plan_retention(candidates, policy, now);
    debug!(
        "{}: keeping {} entries, removing {}",
        target.root.display(),
        plan.keep.len(),
        plan.remove.len()
    );

    let mut outcome = PruneOutcome { root: target.root.clone(), ..PruneOutcome::default() };
    for entry in plan.remove {
        match remove(&entry.path) {
            Ok(()) => outcome.removed.push(entry.path),
            Err(e) => {
                warn!("Failed to remove {}: {}", entry.path.display(), e);
                outcome.failed.push((entry.path, e.to_string()));
            }
        }
    }

    Ok(outcome)
}

/// Prune every target in order, one outcome per target
///
/// Deletion failures under one root do not stop the next root from being
/// pruned; callers check each outcome with [`PruneOutcome::ensure_complete`].
///
/// # Errors
///
/// A scan failure on any root aborts immediately.
pub fn prune_targets(
    targets: &[PruneTarget],
    policy: &RetentionPolicy,
    now: DateTime<Utc>,
) -> Result<Vec<PruneOutcome>> {
    prune_targets_with(targets, policy, now, remove_tree)
}

/// [`prune_targets`] with the deletion step supplied by the caller
pub fn prune_targets_with<F>(
    targets: &[PruneTarget],
    policy: &RetentionPolicy,
    now: DateTime<Utc>,
    remove: F,
) -> Result<Vec<PruneOutcome>>
where
    F: Fn(&Path) -> io::Result<()>,
{
    targets.iter().map(|target| prune_root_with(target, policy, now, &remove)).collect()
}
