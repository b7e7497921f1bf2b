use std::path::Path;

use anyhow::{Context, Result};

/// Check whether a path exists without treating absence as an error
///
/// Returns `Ok(false)` when the path (or one of its parents) does not exist.
///
/// # Errors
///
/// Returns an error for any other I/O failure, e.g. permission denied on a
/// parent directory.
pub fn path_exists(path: &Path) -> Result<bool> {
    path.try_exists().with_context(|| format!("Failed to probe path: {}", path.display()))
}

/// Hidden entries are dot-prefixed (`.git`, `.DS_Store`, ...)
pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

/// Formats `path` relative to `base`, falling back to the full path
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use workbench_ops::utils::relative_display;
///
/// let shown = relative_display(Path::new("/bench/research/notes.md"), Path::new("/bench"));
/// assert_eq!(shown, "research/notes.md");
/// ```
pub fn relative_display(path: &Path, base: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(rest) if rest.as_os_str().is_empty() => ".".to_string(),
        Ok(rest) => rest.to_string_lossy().into_owned(),
        Err(_) => path.to_string_lossy().into_owned(),
    }
}
