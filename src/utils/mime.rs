//! Content types for files under the site root.

use std::path::Path;

pub const HTML: &str = "text/html; charset=utf-8";
pub const PLAIN: &str = "text/plain; charset=utf-8";
const OCTET_STREAM: &str = "application/octet-stream";

/// What a personal site ships: pages, sources, styles, images, fonts, papers.
const BY_EXTENSION: &[(&str, &str)] = &[
    ("html", HTML),
    ("htm", HTML),
    ("md", "text/markdown; charset=utf-8"),
    ("markdown", "text/markdown; charset=utf-8"),
    ("yml", "text/yaml; charset=utf-8"),
    ("yaml", "text/yaml; charset=utf-8"),
    ("txt", PLAIN),
    ("bib", PLAIN),
    ("css", "text/css; charset=utf-8"),
    ("js", "text/javascript; charset=utf-8"),
    ("mjs", "text/javascript; charset=utf-8"),
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("svg", "image/svg+xml"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("ico", "image/x-icon"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("ttf", "font/ttf"),
    ("pdf", "application/pdf"),
];

/// Content type for `path`, by case-insensitive extension.
pub fn from_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| {
            BY_EXTENSION
                .iter()
                .find(|(known, _)| ext.eq_ignore_ascii_case(known))
        })
        .map_or(OCTET_STREAM, |&(_, content_type)| content_type)
}
