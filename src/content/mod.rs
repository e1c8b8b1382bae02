//! Markdown source handling.
//!
//! - [`frontmatter`]: strip the leading `---` block
//! - [`metadata`]: the `last_updated` document
//! - [`render`]: Markdown to HTML, slot injection, profile splice

pub mod frontmatter;
pub mod metadata;
pub mod render;

pub use frontmatter::strip_front_matter;
pub use metadata::Metadata;
pub use render::{CmarkRenderer, ContentRenderer, MarkdownOptions, MarkdownRenderer};
