//! `folio render`: load every slot once and write the finished page.

use std::fs;

use anyhow::{Context, Result, bail};

use super::common::{LoadedPage, load_page_blocking};
use crate::bootstrap::SlotState;
use crate::config::SiteConfig;
use crate::log;
use crate::utils::plural_count;

/// Render the page to `render.output`.
///
/// The page is written even when loading aborts, showing the failure
/// message in every placeholder; the command still fails afterwards.
pub fn render_site(config: &SiteConfig) -> Result<()> {
    let LoadedPage { page, report } = load_page_blocking(config)?;

    let output = config.output_path();
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&output, page.to_html())
        .with_context(|| format!("failed to write {}", output.display()))?;

    log!(
        "render";
        "{} ({} rendered, {} hidden)",
        output.display(),
        plural_count(report.count(SlotState::Rendered), "slot"),
        report.count(SlotState::Hidden)
    );

    if let Some(reason) = report.aborted {
        bail!("loading aborted: {reason}");
    }
    Ok(())
}
