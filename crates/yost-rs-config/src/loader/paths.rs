//! Filesystem lookups used while discovering layers.

use std::path::{Path, PathBuf};

/// Canonical form of `path` for comparing layer locations.
///
/// Paths that cannot be resolved (usually because they do not exist yet) are
/// compared as given.
pub(super) fn resolved(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Walk up from `start` to the first directory holding one of `markers`.
pub(super) fn project_root(start: &Path, markers: &[String]) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        if markers.iter().any(|marker| current.join(marker).exists()) {
            return Some(current.to_path_buf());
        }
        dir = current.parent();
    }
    None
}
