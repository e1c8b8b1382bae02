//! `[content]` section configuration.
//!
//! Controls how content slots are found and how their Markdown is rendered.
//!
//! # Example
//!
//! ```toml
//! [content]
//! source_attr = "data-source"       # Attribute marking a content slot
//! loading_class = "loading"         # Placeholders replaced on total failure
//! failure_message = "Failed to load content."
//! unsafe_html = false               # Pass raw HTML in Markdown through
//! max_bytes = 1048576               # Larger sources fail to render
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Attribute carrying a slot's logical source path.
    pub source_attr: String,

    /// Class of "still loading" placeholders.
    pub loading_class: String,

    /// Text written into placeholders when loading aborts.
    pub failure_message: String,

    /// Keep raw HTML blocks and inline HTML from the source.
    pub unsafe_html: bool,

    /// Upper bound on the size of one Markdown source.
    pub max_bytes: usize,

    pub tables: bool,
    pub footnotes: bool,
    pub strikethrough: bool,
    pub task_lists: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            source_attr: "data-source".into(),
            loading_class: "loading".into(),
            failure_message: "Failed to load content.".into(),
            unsafe_html: false,
            max_bytes: 1024 * 1024,
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
        }
    }
}

impl ContentConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.source_attr.trim().is_empty() {
            diag.error("content.source_attr", "must not be empty");
        }
        if self.loading_class.trim().is_empty() {
            diag.error("content.loading_class", "must not be empty");
        }
        if self.max_bytes == 0 {
            diag.error_with_hint(
                "content.max_bytes",
                "must be greater than 0",
                "the default is 1048576 (1 MiB)",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_content_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.content.source_attr, "data-source");
        assert_eq!(config.content.loading_class, "loading");
        assert_eq!(config.content.failure_message, "Failed to load content.");
        assert!(!config.content.unsafe_html);
        assert_eq!(config.content.max_bytes, 1_048_576);
        assert!(config.content.tables && config.content.footnotes);
    }

    #[test]
    fn test_content_partial_override() {
        let config = test_parse_config("[content]\nsource_attr = \"data-md\"\ntables = false");
        assert_eq!(config.content.source_attr, "data-md");
        assert!(!config.content.tables);
        assert!(config.content.strikethrough);
    }

    #[test]
    fn test_content_validation() {
        let config = test_parse_config("[content]\nsource_attr = \" \"\nmax_bytes = 0");
        let mut diag = ConfigDiagnostics::new();
        config.content.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }
}
