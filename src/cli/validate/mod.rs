//! Site validation command.
//!
//! Runs the same load as `render`, then reports every slot that did not end
//! up rendered and every sidebar anchor that points nowhere.

mod report;

use anyhow::{Result, bail};

use super::common::{LoadedPage, load_page_blocking};
use crate::bootstrap::{LoadReport, SlotState};
use crate::cli::ValidateArgs;
use crate::config::SiteConfig;
use crate::page::Page;
use crate::utils::plural_count;
use crate::log;

pub use report::ValidationReport;

/// Validate slot sources and sidebar anchors.
pub fn validate_site(config: &SiteConfig, args: &ValidateArgs) -> Result<()> {
    let LoadedPage { page, report: load } = load_page_blocking(config)?;
    log!("validate"; "checked {}", plural_count(load.slots.len(), "slot"));

    if load.metadata.as_ref().is_none_or(|m| m.last_updated.is_none()) {
        log!("warning"; "{} has no last_updated", config.site.metadata);
    }

    let report = check_page(config, &page, &load);
    if report.is_empty() {
        log!("validate"; "{}", report);
        return Ok(());
    }

    report.print();
    eprintln!();

    if args.warn_only {
        log!("warning"; "{}", report);
        Ok(())
    } else {
        bail!("validation failed: {}", report)
    }
}

/// Collect findings from a loaded page.
pub fn check_page(config: &SiteConfig, page: &Page, load: &LoadReport) -> ValidationReport {
    let mut report = ValidationReport::default();

    for slot in &load.slots {
        let reason = match slot.state {
            SlotState::Rendered => continue,
            SlotState::Hidden => match (&slot.fetched, &slot.reason) {
                (Some(label), Some(why)) => format!("{label}: {why}"),
                (Some(label), None) => (*label).to_string(),
                (None, _) => "hidden".to_string(),
            },
            SlotState::Pending => match &load.aborted {
                Some(why) => format!("not loaded: {why}"),
                None => "not loaded".to_string(),
            },
        };
        let group = slot
            .section
            .as_ref()
            .map_or_else(|| "page".to_string(), |id| format!("#{id}"));
        report.add_slot(group, slot.source.clone(), reason);
    }

    let page_name = config.site.index.display().to_string();
    let dom = page.dom();
    for link in page.sidebar_links(&config.nav.sidebar_class) {
        let href = dom.attr(link, "href").unwrap_or_default();
        let reason = match href.strip_prefix('#') {
            Some(id) if !id.is_empty() => {
                if dom.get_element_by_id(id).is_some() {
                    continue;
                }
                format!("no element with id `{id}`")
            }
            _ => "not an in-page anchor".to_string(),
        };
        report.add_link(page_name.clone(), href.to_string(), reason);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::common::testing;

    #[test]
    fn test_check_reports_missing_slot_and_dangling_anchor() {
        let (_dir, config) = testing::site();
        let LoadedPage { page, report: load } = load_page_blocking(&config).unwrap();
        let report = check_page(&config, &page, &load);

        let papers = &report.slots["#papers"];
        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].target, "_auto_contents/papers.md");
        assert_eq!(papers[0].reason, "not found");
        assert_eq!(report.slot_error_count(), 1);

        let links = &report.links["index.html"];
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, "#contact");
    }

    #[test]
    fn test_validate_fails_unless_warn_only() {
        let (_dir, config) = testing::site();
        assert!(validate_site(&config, &ValidateArgs { warn_only: false }).is_err());
        assert!(validate_site(&config, &ValidateArgs { warn_only: true }).is_ok());
    }

    #[test]
    fn test_validate_clean_site() {
        let (dir, config) = testing::site();
        std::fs::write(dir.path().join("_auto_contents/papers.md"), "1. A paper").unwrap();
        let html = crate::page::fixture::PAGE_HTML
            .replace("<li><a href=\"#contact\">Contact</a></li>", "");
        std::fs::write(dir.path().join("index.html"), html).unwrap();

        assert!(validate_site(&config, &ValidateArgs { warn_only: false }).is_ok());
    }
}
