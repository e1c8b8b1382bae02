//! URL to filesystem path resolution.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

use crate::utils::path::is_contained;

/// Resolve a request URL to a file under `serve_root`.
///
/// Directories resolve to their `index.html`. Anything that escapes the
/// root, lexically or through a symlink, resolves to `None`.
pub fn resolve_path(url: &str, serve_root: &Path) -> Option<PathBuf> {
    let clean = request_path(url);
    if !is_contained(Path::new(clean.as_ref())) {
        return None;
    }

    let canonical = serve_root.join(clean.as_ref()).canonicalize().ok()?;
    let root_canonical = serve_root.canonicalize().ok()?;
    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    if canonical.is_file() {
        return Some(canonical);
    }

    if canonical.is_dir() {
        let index = canonical.join("index.html");
        if index.is_file() {
            return Some(index);
        }
    }

    None
}

/// Request path without query, fragment and surrounding slashes, decoded.
pub fn request_path(url: &str) -> Cow<'_, str> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let path = path.trim_matches('/');
    percent_decode_str(path)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(path))
}
