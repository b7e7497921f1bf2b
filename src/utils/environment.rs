use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::utils::paths::relative_display;

/// Environment variable consulted when `--root` is not given
pub const ROOT_ENV_VAR: &str = "WORKBENCH_ROOT";

const RUNS_DIR: [&str; 2] = ["state", "runs"];
const DEPLOYMENTS_DIR: [&str; 2] = ["state", "cd"];
const RESEARCH_DIR: &str = "research";

/// Resolve the workspace root: explicit path, then `$WORKBENCH_ROOT`, then the current directory
pub fn resolve_workspace_root(explicit: Option<&Path>) -> Result<PathBuf> {
    resolve_workspace_root_internal(explicit, env::var_os(ROOT_ENV_VAR).map(PathBuf::from))
}

pub(crate) fn resolve_workspace_root_internal(
    explicit: Option<&Path>,
    from_env: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = from_env.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path);
    }
    env::current_dir().context("Failed to determine current directory")
}

/// Directory layout under a workspace root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run archives, one subdirectory per run
    pub fn runs_dir(&self) -> PathBuf {
        RUNS_DIR.iter().fold(self.root.clone(), |path, part| path.join(part))
    }

    /// Deployment records, one subdirectory per deployed run
    pub fn deployments_dir(&self) -> PathBuf {
        DEPLOYMENTS_DIR.iter().fold(self.root.clone(), |path, part| path.join(part))
    }

    pub fn research_dir(&self) -> PathBuf {
        self.root.join(RESEARCH_DIR)
    }

    /// Display a path relative to the workspace root
    pub fn relative(&self, path: &Path) -> String {
        relative_display(path, &self.root)
    }
}
