//! Front matter removal.
//!
//! A front matter block is a line of three dashes, any number of lines, and
//! another line of three dashes ending in a line break:
//!
//! ```text
//! ---
//! title: Papers
//! ---
//! # Papers
//! ```

use regex::Regex;
use std::sync::LazyLock;

static FRONT_MATTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---[ \t]*\r?\n(?:.*?\r?\n)?---[ \t]*\r?\n").unwrap()
});

/// Remove a leading front matter block, returning the rest verbatim.
///
/// Text without a complete block (including one whose closing line is not
/// followed by a line break) is returned unchanged.
pub fn strip_front_matter(text: &str) -> &str {
    match FRONT_MATTER.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}
