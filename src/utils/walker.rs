//! Lazy recursive walk over a documents root.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::utils::paths::is_hidden_name;

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_str().is_some_and(is_hidden_name)
}

/// Yield every non-directory entry under `root`, skipping hidden files and
/// hidden directories (and everything below them)
///
/// Entries are yielded in file-name order per directory. A missing root yields
/// nothing. Entries that vanish mid-walk are logged and skipped; any other walk
/// failure (e.g. permission denied on a directory listing) is yielded as an
/// error.
pub fn document_files(root: &Path) -> impl Iterator<Item = Result<PathBuf>> {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry))
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_dir() => None,
            Ok(entry) => Some(Ok(entry.into_path())),
            Err(err) => {
                let not_found =
                    err.io_error().is_some_and(|io_err| io_err.kind() == io::ErrorKind::NotFound);
                if not_found {
                    let path = err.path().map(|p| p.display().to_string()).unwrap_or_default();
                    if err.depth() == 0 {
                        debug!("Documents root does not exist: {}", path);
                    } else {
                        warn!("Skipping {}: vanished during the directory walk", path);
                    }
                    return None;
                }
                let context = match err.path() {
                    Some(path) => format!("Failed to walk documents under {}", path.display()),
                    None => "Failed to walk documents".to_string(),
                };
                Some(Err(anyhow::Error::new(err).context(context)))
            }
        })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn names(root: &Path) -> Vec<String> {
        document_files(root)
            .map(|p| p.unwrap().strip_prefix(root).unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_walk_finds_nested_files_in_name_order() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("b/deep")).unwrap();
        fs::write(dir.path().join("b/deep/z.md"), "").unwrap();
        fs::write(dir.path().join("a.md"), "").unwrap();
        fs::write(dir.path().join("c.txt"), "").unwrap();

        assert_eq!(names(dir.path()), vec!["a.md", "b/deep/z.md", "c.txt"]);
    }

    #[test]
    fn test_walk_skips_hidden_files_and_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".git/objects")).unwrap();
        fs::write(dir.path().join(".git/objects/blob"), "").unwrap();
        fs::write(dir.path().join(".hidden.md"), "").unwrap();
        fs::write(dir.path().join("visible.md"), "").unwrap();

        assert_eq!(names(dir.path()), vec!["visible.md"]);
    }

    #[test]
    fn test_walk_missing_root_yields_nothing() {
        let dir = TempDir::new().unwrap();
        assert_eq!(document_files(&dir.path().join("missing")).count(), 0);
    }

    #[test]
    fn test_walk_hidden_root_is_still_walked() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join(".research");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("note.md"), "").unwrap();

        assert_eq!(names(&root), vec!["note.md"]);
    }
}
