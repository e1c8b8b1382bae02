//! `[nav]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [nav]
//! sidebar_class = "sidebar"   # Container of the navigation anchors
//! active_class = "active"     # Marker for the entry in view
//! focus_margin = 100.0        # Added to the scroll offset before matching
//! scroll_offset = 40.0        # Gap kept above a section after a click
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub sidebar_class: String,
    pub active_class: String,
    pub focus_margin: f64,
    pub scroll_offset: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            sidebar_class: "sidebar".into(),
            active_class: "active".into(),
            focus_margin: 100.0,
            scroll_offset: 40.0,
        }
    }
}

impl NavConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.sidebar_class.trim().is_empty() {
            diag.error("nav.sidebar_class", "must not be empty");
        }
        if self.active_class.trim().is_empty() {
            diag.error("nav.active_class", "must not be empty");
        }
        if !self.focus_margin.is_finite() {
            diag.error("nav.focus_margin", "must be a finite number");
        }
        if !self.scroll_offset.is_finite() {
            diag.error("nav.scroll_offset", "must be a finite number");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_nav_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.nav.sidebar_class, "sidebar");
        assert_eq!(config.nav.active_class, "active");
        assert_eq!(config.nav.focus_margin, 100.0);
        assert_eq!(config.nav.scroll_offset, 40.0);
    }

    #[test]
    fn test_nav_rejects_non_finite() {
        let config = test_parse_config("[nav]\nfocus_margin = nan\nscroll_offset = inf");
        let mut diag = ConfigDiagnostics::new();
        config.nav.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }
}
