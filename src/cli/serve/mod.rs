//! Local preview server.
//!
//! The index page is loaded from scratch on every request, so edits to the
//! Markdown sources show up on reload. Everything else under the site root
//! is served as a static file. Requests are handled one at a time.
//!
//! With `watch` enabled the page also carries the live reload script, and
//! the browser reloads when a watched source changes.

mod lifecycle;
mod path;
mod response;

use anyhow::Result;
use std::sync::Arc;
use tiny_http::{Request, Server};
use tokio::runtime::Runtime;

use super::common::{fetcher, load_page, runtime};
use crate::bootstrap::SlotState;
use crate::config::SiteConfig;
use crate::fetch::AnyFetcher;
use crate::reload;
use crate::{debug, log};

/// Bind and run the request loop until Ctrl+C.
pub fn serve_site(config: &SiteConfig) -> Result<()> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    crate::core::register_server(Arc::clone(&server));

    let ws_port = if config.serve.watch {
        Some(crate::reload::start(config)?)
    } else {
        None
    };

    log!("serve"; "http://{}", addr);
    SiteHandler::new(config, ws_port)?.run(&server);
    Ok(())
}

/// Per-process state for answering requests.
struct SiteHandler<'a> {
    config: &'a SiteConfig,
    fetcher: AnyFetcher,
    runtime: Runtime,
    /// Live reload port, when watching
    ws_port: Option<u16>,
}

impl<'a> SiteHandler<'a> {
    fn new(config: &'a SiteConfig, ws_port: Option<u16>) -> Result<Self> {
        Ok(Self {
            config,
            fetcher: fetcher(config)?,
            runtime: runtime()?,
            ws_port,
        })
    }

    fn run(&self, server: &Server) {
        for request in server.incoming_requests() {
            if let Err(e) = self.handle(request) {
                log!("serve"; "request error: {e}");
            }
        }
    }

    fn handle(&self, request: Request) -> Result<()> {
        if crate::core::is_shutdown() {
            return response::respond_unavailable(request);
        }
        if !response::is_read_request(&request) {
            return response::respond_method_not_allowed(request);
        }

        debug!("serve"; "{} {}", request.method(), request.url());

        if self.is_page_url(request.url()) {
            return match self.runtime.block_on(load_page(self.config, &self.fetcher)) {
                Ok(loaded) => {
                    debug!(
                        "serve";
                        "page loaded ({} rendered, {} hidden)",
                        loaded.report.count(SlotState::Rendered),
                        loaded.report.count(SlotState::Hidden)
                    );
                    let html = reload::maybe_inject(loaded.page.to_html(), self.ws_port);
                    response::respond_page(request, html)
                }
                Err(e) => {
                    log!("error"; "{:#}", e);
                    response::respond_load_error(request, &e)
                }
            };
        }

        match path::resolve_path(request.url(), &self.config.root) {
            Some(file) => response::respond_file(request, &file),
            None => response::respond_not_found(request),
        }
    }

    /// `/` and the configured index page.
    fn is_page_url(&self, url: &str) -> bool {
        let requested = path::request_path(url);
        requested.is_empty()
            || self
                .config
                .site
                .index
                .to_str()
                .is_some_and(|index| index.trim_start_matches("./") == requested)
    }
}
