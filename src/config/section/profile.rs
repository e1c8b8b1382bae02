//! `[profile]` section configuration.
//!
//! The profile container gets its introduction split into two columns
//! next to a photo.
//!
//! # Example
//!
//! ```toml
//! [profile]
//! container_id = "profile-content"
//! image_src = "assets/images/profile.jpg"
//! image_alt = "Profile photo"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Id of the slot that receives the image splice.
    pub container_id: String,
    pub image_src: String,
    pub image_alt: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            container_id: "profile-content".into(),
            image_src: "assets/images/profile.jpg".into(),
            image_alt: "Profile photo".into(),
        }
    }
}

impl ProfileConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.image_src.trim().is_empty() {
            diag.error("profile.image_src", "must not be empty");
        }
    }
}
