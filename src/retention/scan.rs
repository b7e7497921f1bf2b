use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::models::RunDirectory;
use crate::utils::path_exists;

/// Marker created inside a run archive once the run reached production
pub const PROMOTION_MARKER: &str = "prod";

/// How a candidate's promotion status is determined
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromotionCheck {
    /// Nothing is promoted
    Disabled,
    /// Promoted when `<records_root>/<name>/<marker>` exists
    DeploymentMarker { records_root: PathBuf, marker: String },
    /// Promoted when `<candidate dir>/<marker>` exists
    InnerMarker { marker: String },
}

impl PromotionCheck {
    /// The standard check: a `prod` marker inside the candidate itself
    pub fn inner_marker() -> Self {
        Self::InnerMarker { marker: PROMOTION_MARKER.to_string() }
    }

    /// A `prod` marker in the deployment record of the same name
    ///
    /// Only stable while the records root is not pruned itself: once an expired
    /// record is removed, the run it promoted loses its protection.
    pub fn deployment_marker(records_root: PathBuf) -> Self {
        Self::DeploymentMarker { records_root, marker: PROMOTION_MARKER.to_string() }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Probe one candidate. Absence of the marker is `Ok(false)`
    pub fn is_promoted(&self, name: &str, dir: &Path) -> Result<bool> {
        match self {
            Self::Disabled => Ok(false),
            Self::DeploymentMarker { records_root, marker } => {
                path_exists(&records_root.join(name).join(marker))
            }
            Self::InnerMarker { marker } => path_exists(&dir.join(marker)),
        }
    }
}

/// List the immediate subdirectories of `root` with mtime and promotion status
///
/// Returns an empty Vec if `root` does not exist. Candidates are stat'ed and
/// probed in parallel; the returned order is unspecified (the planner sorts).
///
/// # Errors
///
/// Returns an error if the root exists but cannot be listed, or if a stat or
/// promotion probe fails for a reason other than the entry having vanished.
pub fn scan_candidates(root: &Path, promotion: &PromotionCheck) -> Result<Vec<RunDirectory>> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("Retention root {} does not exist, nothing to prune", root.display());
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to read directory: {}", root.display()));
        }
    };

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to read directory entry in {}", root.display()))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("Failed to read file type: {}", entry.path().display()))?;
        if file_type.is_dir() {
            dirs.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
        }
    }

    dirs.into_par_iter()
        .filter_map(|(name, path)| inspect_candidate(name, path, promotion).transpose())
        .collect()
}

fn inspect_candidate(
    name: String,
    path: PathBuf,
    promotion: &PromotionCheck,
) -> Result<Option<RunDirectory>> {
    let metadata = match fs::metadata(&path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("Skipping {}: removed before it could be inspected", path.display());
            return Ok(None);
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to stat {}", path.display())),
    };
    let modified: DateTime<Utc> = metadata
        .modified()
        .with_context(|| format!("Failed to read modification time: {}", path.display()))?
        .into();
    let promoted = promotion.is_promoted(&name, &path)?;

    Ok(Some(RunDirectory { name, path, modified, promoted }))
}
