//! Shared command plumbing: read the page, pick a fetcher, run the loader.

use anyhow::{Context, Result};

use crate::bootstrap::{LoadReport, bootstrap};
use crate::config::SiteConfig;
use crate::content::{CmarkRenderer, MarkdownOptions};
use crate::fetch::AnyFetcher;
use crate::page::Page;
use crate::utils::date::current_year;
use crate::debug;

/// A page after one full load.
pub struct LoadedPage {
    pub page: Page,
    pub report: LoadReport,
}

/// Single-threaded runtime; slots load one at a time anyway.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")
}

/// Parse the configured index page.
pub fn read_page(config: &SiteConfig) -> Result<Page> {
    let path = config.index_path();
    let html = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Page::parse(&html).with_context(|| format!("failed to parse {}", path.display()))
}

/// Fetcher for the configured content origin.
pub fn fetcher(config: &SiteConfig) -> Result<AnyFetcher> {
    let fetcher = AnyFetcher::from_config(config)?;
    debug!("fetch"; "sources from {}", fetcher.describe());
    Ok(fetcher)
}

/// Read the index page and run the loader over it.
pub async fn load_page(config: &SiteConfig, fetcher: &AnyFetcher) -> Result<LoadedPage> {
    let mut page = read_page(config)?;
    let renderer = CmarkRenderer::new(MarkdownOptions::from_config(&config.content));
    let report = bootstrap(&mut page, fetcher, &renderer, config, current_year()).await;
    Ok(LoadedPage { page, report })
}

/// Blocking wrapper around [`load_page`] for one-shot commands.
pub fn load_page_blocking(config: &SiteConfig) -> Result<LoadedPage> {
    let fetcher = fetcher(config)?;
    runtime()?.block_on(load_page(config, &fetcher))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::SlotState;

    #[test]
    fn test_load_page_from_disk() {
        let (_dir, config) = testing::site();
        let loaded = load_page_blocking(&config).unwrap();

        assert_eq!(loaded.report.count(SlotState::Rendered), 2);
        assert_eq!(loaded.report.count(SlotState::Hidden), 1);
        let html = loaded.page.to_html();
        assert!(html.contains("<h1>Jane Doe</h1>"));
        assert!(html.contains("2025-03-01"));
        assert!(!html.contains("title: Profile"));
    }

    #[test]
    fn test_missing_index_is_error() {
        let (dir, config) = testing::site();
        std::fs::remove_file(dir.path().join("index.html")).unwrap();
        let err = load_page_blocking(&config).err().unwrap();
        assert!(err.to_string().contains("failed to read"));
    }
}
