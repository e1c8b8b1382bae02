//! Filesystem path normalization.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Whether `relative` stays below the directory it is joined onto.
///
/// Rejects absolute paths and any `..` component, without touching the disk.
pub fn is_contained(relative: &Path) -> bool {
    use std::path::Component;
    relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_absolute() {
        let path = Path::new("/absolute/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_normalize_path_relative() {
        let path = Path::new("relative/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_is_contained() {
        assert!(is_contained(Path::new("contents/profile.md")));
        assert!(is_contained(Path::new("./a/b.md")));
        assert!(!is_contained(Path::new("../secret.md")));
        assert!(!is_contained(Path::new("a/../../b.md")));
        assert!(!is_contained(Path::new("/etc/passwd")));
    }
}
