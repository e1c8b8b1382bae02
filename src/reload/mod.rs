//! Live reload for `folio serve`.
//!
//! ```text
//! SiteWatcher (notify) -> Debouncer -> ReloadHub (tungstenite) -> Browser
//! ```
//!
//! The served page carries a small script that opens a WebSocket to the
//! hub and reloads itself on a `reload` message. The page is rebuilt on
//! every request anyway, so a plain reload picks up every change.

pub mod message;
pub mod server;
pub mod watch;

use anyhow::Result;

use crate::config::SiteConfig;
use crate::log;
use message::ReloadMessage;
use server::ReloadHub;
use watch::SiteWatcher;

/// Start watching the site and accepting reload clients.
///
/// Returns the WebSocket port actually bound.
pub fn start(config: &SiteConfig) -> Result<u16> {
    let hub = ReloadHub::default();
    let watcher = SiteWatcher::new(&config.root, &config.serve.watch_paths)?;
    let port = server::start_ws_server(config.serve.interface, config.serve.ws_port, hub.clone())?;

    std::thread::spawn(move || watcher.run(hub));
    log!("watch"; "live reload on ws port {}", port);
    Ok(port)
}

/// Client side of the reload protocol.
pub fn client_script(ws_port: u16) -> String {
    format!(
        "<script>(() => {{\
const ws = new WebSocket(`ws://${{location.hostname}}:{ws_port}/`);\
ws.onmessage = (e) => {{ if (JSON.parse(e.data).type === \"{}\") location.reload(); }};\
}})();</script>",
        ReloadMessage::RELOAD_TYPE
    )
}

/// Insert the client script before the last `</body>`, or append it.
pub fn maybe_inject(html: String, ws_port: Option<u16>) -> String {
    let Some(port) = ws_port else {
        return html;
    };
    let script = client_script(port);

    // ASCII lowercasing keeps byte offsets
    match html.to_ascii_lowercase().rfind("</body>") {
        Some(pos) => {
            let mut out = String::with_capacity(html.len() + script.len());
            out.push_str(&html[..pos]);
            out.push_str(&script);
            out.push_str(&html[pos..]);
            out
        }
        None => html + &script,
    }
}
