//! Reload message protocol.
//!
//! JSON frames sent from the hub to browser clients:
//!
//! - `{"type":"connected","version":"..."}` right after the handshake
//! - `{"type":"reload","reason":"..."}` when watched files change

use serde::{Deserialize, Serialize};

/// Message sent over the WebSocket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReloadMessage {
    /// Reload the whole page
    Reload {
        /// Changed paths, for the browser console
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    /// Connection established
    Connected {
        /// Server version
        version: String,
    },
}

impl ReloadMessage {
    /// Value of the `type` tag the client script listens for.
    pub const RELOAD_TYPE: &'static str = "reload";

    pub fn reload(reason: impl Into<String>) -> Self {
        Self::Reload {
            reason: Some(reason.into()),
        }
    }

    pub fn connected() -> Self {
        Self::Connected {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Serialize to JSON, falling back to a bare reload.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"reload"}"#.to_string())
    }
}
