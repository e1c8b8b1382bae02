//! `[site]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [site]
//! index = "index.html"                        # Page markup, relative to root
//! metadata = "_auto_contents/metadata.yml"    # Document carrying `last_updated`
//! base_url = "https://example.org"            # Fetch sources over HTTP instead
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::ConfigDiagnostics;

/// Where the page and its sources live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Page markup, relative to the site root.
    pub index: PathBuf,

    /// Logical source path of the metadata document.
    pub metadata: String,

    /// When set, sources are fetched from this origin instead of the root.
    pub base_url: Option<String>,
}

impl Default for SiteSectionConfig {
    fn default() -> Self {
        Self {
            index: PathBuf::from("index.html"),
            metadata: "_auto_contents/metadata.yml".into(),
            base_url: None,
        }
    }
}

impl SiteSectionConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.index.as_os_str().is_empty() {
            diag.error("site.index", "must not be empty");
        } else if self.index.is_absolute() {
            diag.error_with_hint(
                "site.index",
                "must be relative to the site root",
                "use --root to point at another directory",
            );
        }

        if let Some(base) = &self.base_url {
            match url::Url::parse(base) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                Ok(url) => diag.error(
                    "site.base_url",
                    format!("unsupported scheme `{}`", url.scheme()),
                ),
                Err(e) => diag.error_with_hint(
                    "site.base_url",
                    format!("invalid URL: {e}"),
                    "include the scheme, e.g. https://example.org",
                ),
            }
        }
    }
}
