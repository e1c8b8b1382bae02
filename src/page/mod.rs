//! The owned page state.
//!
//! [`Page`] bundles everything a loaded document has: the DOM, the viewport,
//! section layout and the wired navigation handlers. Components take it
//! explicitly, so tests can assert on the result without a browser.
//!
//! Layout is not computed here. The host supplies each section's bounds with
//! [`Page::set_bounds`]; sections without bounds never match a scroll position.

mod dom;
pub mod nav;
pub mod visibility;

pub use dom::{Dom, DomError, NodeId};
pub use nav::NavigationSynchronizer;
pub use visibility::SectionVisibilityController;

use std::collections::HashMap;

/// Vertical extent of a section in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionBounds {
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Half-open: `[top, top + height)`.
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// A scroll the page asked the viewport to perform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

#[derive(Debug, Clone, Default)]
pub struct Viewport {
    pub scroll_y: f64,
    /// Most recent request issued through [`Page::scroll_to`].
    pub last_request: Option<ScrollRequest>,
}

/// Events delivered by the host.
#[derive(Debug, Clone, Copy)]
pub enum PageEvent {
    /// The viewport now sits at `y`.
    Scroll { y: f64 },
    /// A click on `target` (any node; handlers look for the enclosing link).
    Click { target: NodeId },
}

/// What handlers did with an event.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EventOutcome {
    pub default_prevented: bool,
    pub scrolled_to: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Page {
    dom: Dom,
    viewport: Viewport,
    bounds: HashMap<String, SectionBounds>,
    navigation: Option<NavigationSynchronizer>,
}

impl Page {
    pub fn new(dom: Dom) -> Self {
        Self {
            dom,
            viewport: Viewport::default(),
            bounds: HashMap::new(),
            navigation: None,
        }
    }

    pub fn parse(html: &str) -> Result<Self, DomError> {
        Dom::parse(html).map(Self::new)
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn to_html(&self) -> String {
        self.dom.to_html()
    }

    // ========================================================================
    // Layout
    // ========================================================================

    /// Record the layout of the element with `id`.
    pub fn set_bounds(&mut self, id: impl Into<String>, bounds: SectionBounds) {
        self.bounds.insert(id.into(), bounds);
    }

    pub fn bounds(&self, id: &str) -> Option<SectionBounds> {
        self.bounds.get(id).copied()
    }

    /// Move the viewport. Targets above the document are clamped to 0.
    pub fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) -> f64 {
        let top = top.max(0.0);
        self.viewport.scroll_y = top;
        self.viewport.last_request = Some(ScrollRequest { top, behavior });
        top
    }

    // ========================================================================
    // Sidebar
    // ========================================================================

    /// Anchors inside the sidebar container, in document order.
    pub fn sidebar_links(&self, sidebar_class: &str) -> Vec<NodeId> {
        self.dom
            .elements_by_tag("a")
            .into_iter()
            .filter(|a| self.dom.has_ancestor_with_class(*a, sidebar_class))
            .collect()
    }

    /// First sidebar anchor whose `href` is exactly `#section_id`.
    pub fn sidebar_link_for(&self, sidebar_class: &str, section_id: &str) -> Option<NodeId> {
        let href = format!("#{section_id}");
        self.sidebar_links(sidebar_class)
            .into_iter()
            .find(|a| self.dom.attr(*a, "href") == Some(href.as_str()))
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Install the scroll and click handlers. Before this, events only move
    /// the viewport.
    pub fn wire_navigation(&mut self, navigation: NavigationSynchronizer) {
        self.navigation = Some(navigation);
    }

    pub fn is_navigation_wired(&self) -> bool {
        self.navigation.is_some()
    }

    /// Deliver one event to the wired handlers.
    ///
    /// A click that scrolls is followed by the scroll event it causes.
    pub fn dispatch(&mut self, event: PageEvent) -> EventOutcome {
        let Some(navigation) = self.navigation.take() else {
            if let PageEvent::Scroll { y } = event {
                self.viewport.scroll_y = y;
            }
            return EventOutcome::default();
        };

        let outcome = match event {
            PageEvent::Scroll { y } => {
                self.viewport.scroll_y = y;
                navigation.on_scroll(self, y);
                EventOutcome::default()
            }
            PageEvent::Click { target } => {
                let outcome = navigation.on_click(self, target);
                if let Some(y) = outcome.scrolled_to {
                    navigation.on_scroll(self, y);
                }
                outcome
            }
        };

        self.navigation = Some(navigation);
        outcome
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    //! A page shaped like the real site: sidebar, one section per slot.

    use super::{Page, SectionBounds};

    pub const PAGE_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Portfolio</title></head>
<body>
<nav class="sidebar">
  <ul>
    <li><a href="#profile">Profile</a></li>
    <li><a href="#papers">Papers</a></li>
    <li><a href="#awards">Awards</a></li>
    <li><a href="#contact">Contact</a></li>
  </ul>
</nav>
<main>
  <section id="profile">
    <div id="profile-content" class="markdown-content" data-source="_auto_contents/profile.md"><p class="loading">Loading...</p></div>
  </section>
  <section id="papers">
    <h2>Papers</h2>
    <div id="papers-content" class="markdown-content" data-source="_auto_contents/papers.md"><p class="loading">Loading...</p></div>
  </section>
  <section id="awards">
    <h2>Awards</h2>
    <div id="awards-content" class="markdown-content" data-source="/_contents/awards.md"><p class="loading">Loading...</p></div>
  </section>
</main>
<footer>
  <p>&copy; <span id="current-year"></span> Example. Last updated: <span id="last-updated">-</span></p>
</footer>
</body>
</html>"##;

    /// Sections stacked at 0, 500 and 1200.
    pub fn page() -> Page {
        let mut page = Page::parse(PAGE_HTML).unwrap();
        page.set_bounds("profile", SectionBounds::new(0.0, 500.0));
        page.set_bounds("papers", SectionBounds::new(500.0, 700.0));
        page.set_bounds("awards", SectionBounds::new(1200.0, 400.0));
        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NavConfig;

    #[test]
    fn test_bounds_half_open() {
        let b = SectionBounds::new(100.0, 50.0);
        assert!(b.contains(100.0));
        assert!(b.contains(149.9));
        assert!(!b.contains(150.0));
        assert!(!b.contains(99.0));
    }

    #[test]
    fn test_sidebar_links() {
        let page = fixture::page();
        assert_eq!(page.sidebar_links("sidebar").len(), 4);
        assert!(page.sidebar_links("missing").is_empty());

        let link = page.sidebar_link_for("sidebar", "papers").unwrap();
        assert_eq!(page.dom().text_content(link), "Papers");
        assert!(page.sidebar_link_for("sidebar", "pap").is_none());
    }

    #[test]
    fn test_scroll_to_clamps() {
        let mut page = fixture::page();
        assert_eq!(page.scroll_to(-40.0, ScrollBehavior::Smooth), 0.0);
        assert_eq!(page.viewport().scroll_y, 0.0);
        assert_eq!(
            page.viewport().last_request,
            Some(ScrollRequest {
                top: 0.0,
                behavior: ScrollBehavior::Smooth
            })
        );
    }

    #[test]
    fn test_events_before_wiring_do_nothing() {
        let mut page = fixture::page();
        let link = page.sidebar_link_for("sidebar", "papers").unwrap();

        let outcome = page.dispatch(PageEvent::Click { target: link });
        assert_eq!(outcome, EventOutcome::default());
        assert!(page.viewport().last_request.is_none());

        page.dispatch(PageEvent::Scroll { y: 600.0 });
        assert_eq!(page.viewport().scroll_y, 600.0);
        assert!(!page.dom().has_class(link, "active"));
    }

    #[test]
    fn test_click_dispatch_updates_active_entry() {
        let mut page = fixture::page();
        page.wire_navigation(NavigationSynchronizer::new(&NavConfig::default()));
        let link = page.sidebar_link_for("sidebar", "awards").unwrap();

        let outcome = page.dispatch(PageEvent::Click { target: link });
        assert!(outcome.default_prevented);
        assert_eq!(outcome.scrolled_to, Some(1160.0));
        assert!(page.dom().has_class(link, "active"));
        assert!(page.is_navigation_wired());
    }
}
