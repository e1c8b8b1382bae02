//! Sidebar navigation: scroll tracking and smooth-scroll clicks.

use super::{EventOutcome, NodeId, Page, ScrollBehavior};
use crate::config::NavConfig;

/// Keeps the sidebar's active entry in step with the viewport.
#[derive(Debug, Clone)]
pub struct NavigationSynchronizer {
    sidebar_class: String,
    active_class: String,
    /// Added to the scroll offset to get the focus point.
    focus_margin: f64,
    /// Gap left above a section scrolled to by a click.
    scroll_offset: f64,
}

impl NavigationSynchronizer {
    pub fn new(config: &NavConfig) -> Self {
        Self {
            sidebar_class: config.sidebar_class.clone(),
            active_class: config.active_class.clone(),
            focus_margin: config.focus_margin,
            scroll_offset: config.scroll_offset,
        }
    }

    /// Id of the section under the focus point, if any.
    ///
    /// Hidden sections and sections without an id or bounds never match.
    /// When sections overlap, the last one in document order wins.
    pub fn section_at(&self, page: &Page, scroll_y: f64) -> Option<String> {
        let focus = scroll_y + self.focus_margin;
        let dom = page.dom();

        let mut matched = None;
        for section in dom.elements_by_tag("section") {
            if dom.is_hidden(section) {
                continue;
            }
            let Some(id) = dom.attr(section, "id").filter(|id| !id.is_empty()) else {
                continue;
            };
            if page.bounds(id).is_some_and(|b| b.contains(focus)) {
                matched = Some(id.to_string());
            }
        }
        matched
    }

    /// Clear every active marker, then mark the entry of the section under
    /// the focus point. Returns the newly active anchor.
    pub fn on_scroll(&self, page: &mut Page, scroll_y: f64) -> Option<NodeId> {
        for link in page.sidebar_links(&self.sidebar_class) {
            page.dom_mut().remove_class(link, &self.active_class);
        }

        let section = self.section_at(page, scroll_y)?;
        let link = page.sidebar_link_for(&self.sidebar_class, &section)?;
        page.dom_mut().add_class(link, &self.active_class);
        Some(link)
    }

    /// Handle a click on `target`.
    ///
    /// Clicks outside sidebar anchors are left alone. Sidebar clicks never
    /// navigate; if the fragment names an element, the viewport smoothly
    /// scrolls to its top minus the offset. Elements without recorded bounds
    /// count as sitting at the top of the document.
    pub fn on_click(&self, page: &mut Page, target: NodeId) -> EventOutcome {
        let dom = page.dom();
        let Some(anchor) = dom.closest(target, "a") else {
            return EventOutcome::default();
        };
        if !dom.has_ancestor_with_class(anchor, &self.sidebar_class) {
            return EventOutcome::default();
        }

        let mut outcome = EventOutcome {
            default_prevented: true,
            scrolled_to: None,
        };

        let Some(id) = dom
            .attr(anchor, "href")
            .and_then(|href| href.strip_prefix('#'))
            .map(str::to_string)
        else {
            return outcome;
        };
        if dom.get_element_by_id(&id).is_none() {
            return outcome;
        }

        let top = page.bounds(&id).map_or(0.0, |b| b.top);
        let y = page.scroll_to(top - self.scroll_offset, ScrollBehavior::Smooth);
        outcome.scrolled_to = Some(y);
        outcome
    }
}
