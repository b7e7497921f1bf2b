use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};

/// One immediate subdirectory of a run archive or deployment record root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDirectory {
    pub name: String,
    pub path: PathBuf,
    pub modified: DateTime<Utc>,
    pub promoted: bool,
}

/// Keep-count / keep-age thresholds for one prune pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Number of most recent entries eligible for retention
    pub keep_count: usize,
    /// Maximum age in days for non-promoted entries
    pub keep_days: u64,
}

/// Keep/remove partition, both halves ordered newest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionPlan {
    pub keep: Vec<RunDirectory>,
    pub remove: Vec<RunDirectory>,
}

/// Result of deleting the remove half of a [`RetentionPlan`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneOutcome {
    pub root: PathBuf,
    pub removed: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl PruneOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Turn recorded deletion failures into an error
    pub fn ensure_complete(&self) -> Result<()> {
        if let Some((path, reason)) = self.failed.first() {
            bail!(
                "Failed to remove {} of {} directories under {} (first failure: {}: {})",
                self.failed.len(),
                self.failed.len() + self.removed.len(),
                self.root.display(),
                path.display(),
                reason
            );
        }
        Ok(())
    }
}
