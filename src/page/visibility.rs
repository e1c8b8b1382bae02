//! Hiding sections whose content could not be shown.
//!
//! A section and its sidebar entry are always hidden together, so the
//! sidebar never links to something that is not on the page.

use super::{NodeId, Page};

/// What [`SectionVisibilityController::hide_for_slot`] hid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenSection {
    pub section: NodeId,
    pub id: Option<String>,
    /// The parent of the matching sidebar anchor (usually its `<li>`).
    pub sidebar_entry: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct SectionVisibilityController {
    sidebar_class: String,
}

impl SectionVisibilityController {
    pub fn new(sidebar_class: impl Into<String>) -> Self {
        Self {
            sidebar_class: sidebar_class.into(),
        }
    }

    /// Hide the section enclosing `slot` and its sidebar entry.
    ///
    /// No enclosing section is a no-op. A section without an id hides only
    /// itself. Hiding twice leaves the page as hiding once did.
    pub fn hide_for_slot(&self, page: &mut Page, slot: NodeId) -> Option<HiddenSection> {
        let section = page.dom().closest(slot, "section")?;
        let id = page
            .dom()
            .attr(section, "id")
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        let sidebar_entry = id
            .as_deref()
            .and_then(|id| page.sidebar_link_for(&self.sidebar_class, id))
            .and_then(|link| page.dom().parent_element(link));

        let dom = page.dom_mut();
        dom.set_style_property(section, "display", "none");
        if let Some(entry) = sidebar_entry {
            dom.set_style_property(entry, "display", "none");
        }

        Some(HiddenSection {
            section,
            id,
            sidebar_entry,
        })
    }
}
