//! Page load: footer fields, navigation wiring, metadata, content slots.
//!
//! Slots are loaded one after another in document order. Every per-slot
//! failure ends with the slot's section hidden and the loop moving on; only a
//! [`FetchError`] (the fetcher itself is unusable) stops it, after which all
//! loading placeholders show the failure message.

use crate::config::SiteConfig;
use crate::content::{ContentRenderer, MarkdownRenderer, Metadata, strip_front_matter};
use crate::fetch::{FetchError, FetchOutcome, Fetcher};
use crate::page::{NavigationSynchronizer, NodeId, Page, SectionVisibilityController};
use crate::{debug, log};

const CURRENT_YEAR_ID: &str = "current-year";
const LAST_UPDATED_ID: &str = "last-updated";

/// Lifecycle of one content slot within a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Not processed (the load was aborted first).
    Pending,
    Rendered,
    Hidden,
}

#[derive(Debug, Clone)]
pub struct SlotReport {
    pub source: String,
    /// Id of the enclosing section, or of the slot itself.
    pub section: Option<String>,
    pub state: SlotState,
    /// Fetch classification, `None` while pending.
    pub fetched: Option<&'static str>,
    /// Network failure reason or render error.
    pub reason: Option<String>,
}

impl SlotReport {
    fn pending(source: String, section: Option<String>) -> Self {
        Self {
            source,
            section,
            state: SlotState::Pending,
            fetched: None,
            reason: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub slots: Vec<SlotReport>,
    /// Parsed metadata document, if it was retrieved.
    pub metadata: Option<Metadata>,
    /// Why the load stopped early.
    pub aborted: Option<String>,
}

impl LoadReport {
    pub fn count(&self, state: SlotState) -> usize {
        self.slots.iter().filter(|s| s.state == state).count()
    }
}

/// What to do with a slot given its fetch outcome.
#[derive(Debug, PartialEq, Eq)]
pub enum SlotAction<'a> {
    Render(&'a str),
    Hide,
}

/// Only a non-blank body is rendered; everything else hides the section.
pub fn decide(outcome: &FetchOutcome) -> SlotAction<'_> {
    match outcome {
        FetchOutcome::Success(text) => SlotAction::Render(text),
        FetchOutcome::EmptySuccess | FetchOutcome::NotFound | FetchOutcome::NetworkError(_) => {
            SlotAction::Hide
        }
    }
}

// ============================================================================
// Slot loading
// ============================================================================

/// Fetch, strip and render one slot, or hide its section.
pub struct SlotLoader<'a, F, R: ?Sized> {
    fetcher: &'a F,
    content: ContentRenderer<'a, R>,
    visibility: SectionVisibilityController,
    source_attr: &'a str,
}

impl<'a, F: Fetcher, R: MarkdownRenderer + ?Sized> SlotLoader<'a, F, R> {
    pub fn new(fetcher: &'a F, renderer: &'a R, config: &'a SiteConfig) -> Self {
        Self {
            fetcher,
            content: ContentRenderer::new(renderer, &config.profile),
            visibility: SectionVisibilityController::new(config.nav.sidebar_class.as_str()),
            source_attr: &config.content.source_attr,
        }
    }

    pub fn source_of(&self, page: &Page, slot: NodeId) -> String {
        page.dom()
            .attr(slot, self.source_attr)
            .unwrap_or_default()
            .to_string()
    }

    /// Id of the section a slot belongs to.
    pub fn section_of(&self, page: &Page, slot: NodeId) -> Option<String> {
        let dom = page.dom();
        dom.closest(slot, "section")
            .and_then(|s| dom.attr(s, "id"))
            .or_else(|| dom.attr(slot, "id"))
            .map(str::to_string)
    }

    fn pending(&self, page: &Page, slot: NodeId) -> SlotReport {
        SlotReport::pending(self.source_of(page, slot), self.section_of(page, slot))
    }

    /// Bring one slot to a terminal state.
    pub async fn load(&self, page: &mut Page, slot: NodeId) -> Result<SlotReport, FetchError> {
        let source = self.source_of(page, slot);
        let section = self.section_of(page, slot);
        let outcome = self.fetcher.fetch(&source).await?;

        let mut reason = match &outcome {
            FetchOutcome::NetworkError(why) => Some(why.clone()),
            _ => None,
        };

        let state = match decide(&outcome) {
            SlotAction::Render(text) => {
                match self
                    .content
                    .render_into(page.dom_mut(), slot, strip_front_matter(text))
                {
                    Ok(()) => SlotState::Rendered,
                    Err(e) => {
                        reason = Some(e.to_string());
                        self.visibility.hide_for_slot(page, slot);
                        SlotState::Hidden
                    }
                }
            }
            SlotAction::Hide => {
                self.visibility.hide_for_slot(page, slot);
                SlotState::Hidden
            }
        };

        match (state, &reason) {
            (SlotState::Rendered, _) => log!("load"; "{}", source),
            (_, Some(why)) => log!("hide"; "{} ({}: {})", source, outcome.label(), why),
            (_, None) => log!("hide"; "{} ({})", source, outcome.label()),
        }

        Ok(SlotReport {
            source,
            section,
            state,
            fetched: Some(outcome.label()),
            reason,
        })
    }
}

// ============================================================================
// Bootstrap
// ============================================================================

/// Run the full page load once.
pub async fn bootstrap<F, R>(
    page: &mut Page,
    fetcher: &F,
    renderer: &R,
    config: &SiteConfig,
    year: u16,
) -> LoadReport
where
    F: Fetcher,
    R: MarkdownRenderer + ?Sized,
{
    set_text_by_id(page, CURRENT_YEAR_ID, &year.to_string());
    page.wire_navigation(NavigationSynchronizer::new(&config.nav));

    let mut report = LoadReport {
        metadata: load_metadata(page, fetcher, &config.site.metadata).await,
        ..LoadReport::default()
    };

    let loader = SlotLoader::new(fetcher, renderer, config);
    let slots = page.dom().elements_with_attr(&config.content.source_attr);
    debug!("load"; "{} slot(s)", slots.len());

    let mut remaining = slots.into_iter();
    while let Some(slot) = remaining.next() {
        // A slot inside content rendered earlier in this load no longer exists.
        if !page.dom().is_attached(slot) {
            continue;
        }

        match loader.load(page, slot).await {
            Ok(slot_report) => report.slots.push(slot_report),
            Err(e) => {
                log!("error"; "loading aborted: {}", e);
                report.slots.push(loader.pending(page, slot));
                report.slots.extend(
                    remaining
                        .by_ref()
                        .filter(|s| page.dom().is_attached(*s))
                        .map(|s| loader.pending(page, s)),
                );
                report.aborted = Some(e.to_string());
                show_failure(page, &config.content.loading_class, &config.content.failure_message);
                break;
            }
        }
    }

    report
}

/// Fetch and display the metadata document. Never fatal.
async fn load_metadata<F: Fetcher>(page: &mut Page, fetcher: &F, source: &str) -> Option<Metadata> {
    let text = match fetcher.fetch(source).await {
        Ok(FetchOutcome::Success(text)) => text,
        Ok(outcome) => {
            debug!("meta"; "{} ({})", source, outcome.label());
            return None;
        }
        Err(e) => {
            debug!("meta"; "{} unavailable: {}", source, e);
            return None;
        }
    };

    let metadata = Metadata::parse(&text);
    match &metadata.last_updated {
        Some(value) => {
            set_text_by_id(page, LAST_UPDATED_ID, value);
            debug!("meta"; "last updated {}", value);
        }
        None => debug!("meta"; "{} has no last_updated", source),
    }
    Some(metadata)
}

/// Replace every loading placeholder's text with `message`.
fn show_failure(page: &mut Page, loading_class: &str, message: &str) {
    for placeholder in page.dom().elements_with_class(loading_class) {
        page.dom_mut().set_text(placeholder, message);
    }
}

fn set_text_by_id(page: &mut Page, id: &str, text: &str) {
    if let Some(node) = page.dom().get_element_by_id(id) {
        page.dom_mut().set_text(node, text);
    }
}
