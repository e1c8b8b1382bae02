//! `[serve]` section configuration.
//!
//! Contains preview server and live reload settings.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 8000                 # HTTP port number
//! watch = true                # Reload the browser when watched files change
//! ws_port = 35729             # WebSocket port for reload notifications
//! watch_paths = ["index.html", "assets/css", "assets/js", "_auto_contents", "_contents"]
//! ```
//!
//! Use `interface = "0.0.0.0"` to make the server accessible from LAN.

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// Preview server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// Enable file watcher for live reload.
    pub watch: bool,

    /// First WebSocket port tried for reload notifications.
    pub ws_port: u16,

    /// Files and directories watched, relative to the site root.
    /// Missing entries are skipped.
    pub watch_paths: Vec<PathBuf>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 8000,
            watch: true,
            ws_port: 35729,
            watch_paths: ["index.html", "assets/css", "assets/js", "_auto_contents", "_contents"]
                .into_iter()
                .map(PathBuf::from)
                .collect(),
        }
    }
}

impl ServeConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.port == 0 {
            diag.error_with_hint("serve.port", "must not be 0", "pick a free port such as 8000");
        }
        if self.watch && self.ws_port == 0 {
            diag.error_with_hint(
                "serve.ws_port",
                "must not be 0",
                "the default is 35729, or set `watch = false`",
            );
        }
        if self.watch && self.ws_port == self.port {
            diag.error("serve.ws_port", "must differ from serve.port");
        }
        if self.watch_paths.iter().any(|p| p.is_absolute()) {
            diag.error("serve.watch_paths", "entries must be relative to the site root");
        }
    }
}
