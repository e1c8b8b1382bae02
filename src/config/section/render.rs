//! `[render]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [render]
//! output = "rendered.html"    # Written by `folio render`, relative to root
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub output: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("rendered.html"),
        }
    }
}
