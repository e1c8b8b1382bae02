//! Markdown rendering and slot injection.
//!
//! Rendering is split in two:
//! - [`MarkdownRenderer`]: text in, HTML out (pulldown-cmark by default)
//! - [`ContentRenderer`]: assigns that HTML to a slot and applies the
//!   profile image splice when the slot is the profile container

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};
use thiserror::Error;

use crate::config::{ContentConfig, ProfileConfig};
use crate::page::{Dom, DomError, NodeId};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("source is {len} bytes, over the {limit} byte limit")]
    TooLarge { len: usize, limit: usize },

    #[error("rendered HTML could not be injected")]
    Inject(#[from] DomError),
}

// ============================================================================
// Markdown conversion
// ============================================================================

/// Options for markdown conversion
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    /// Enable tables extension
    pub tables: bool,
    /// Enable footnotes extension
    pub footnotes: bool,
    /// Enable strikethrough extension
    pub strikethrough: bool,
    /// Enable task lists extension
    pub task_lists: bool,
    /// Emit raw HTML from the source instead of escaping it
    pub unsafe_html: bool,
    /// Larger inputs fail with [`RenderError::TooLarge`]
    pub max_bytes: usize,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self::from_config(&ContentConfig::default())
    }
}

impl MarkdownOptions {
    pub fn from_config(content: &ContentConfig) -> Self {
        Self {
            tables: content.tables,
            footnotes: content.footnotes,
            strikethrough: content.strikethrough,
            task_lists: content.task_lists,
            unsafe_html: content.unsafe_html,
            max_bytes: content.max_bytes,
        }
    }

    /// Convert to pulldown-cmark Options
    fn to_pulldown_options(&self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.footnotes {
            opts.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.task_lists {
            opts.insert(Options::ENABLE_TASKLISTS);
        }
        opts
    }
}

/// Markdown to HTML conversion.
pub trait MarkdownRenderer {
    fn render(&self, markdown: &str) -> Result<String, RenderError>;
}

/// [`MarkdownRenderer`] backed by pulldown-cmark.
#[derive(Debug, Clone, Default)]
pub struct CmarkRenderer {
    options: MarkdownOptions,
}

impl CmarkRenderer {
    pub fn new(options: MarkdownOptions) -> Self {
        Self { options }
    }
}

impl MarkdownRenderer for CmarkRenderer {
    fn render(&self, markdown: &str) -> Result<String, RenderError> {
        if markdown.len() > self.options.max_bytes {
            return Err(RenderError::TooLarge {
                len: markdown.len(),
                limit: self.options.max_bytes,
            });
        }

        let unsafe_html = self.options.unsafe_html;
        let parser = Parser::new_ext(markdown, self.options.to_pulldown_options()).map(
            |event| match event {
                // Raw HTML is shown as text unless explicitly allowed.
                Event::Html(raw) | Event::InlineHtml(raw) if !unsafe_html => Event::Text(raw),
                Event::Start(tag) if !unsafe_html => Event::Start(neutralize_destination(tag)),
                other => other,
            },
        );

        let mut out = String::with_capacity(markdown.len() + markdown.len() / 2);
        html::push_html(&mut out, parser);
        Ok(out)
    }
}

/// Point script-capable link and image destinations at `#`.
fn neutralize_destination(tag: Tag<'_>) -> Tag<'_> {
    match tag {
        Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        } if is_unsafe_destination(&dest_url, false) => Tag::Link {
            link_type,
            dest_url: CowStr::Borrowed("#"),
            title,
            id,
        },
        Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        } if is_unsafe_destination(&dest_url, true) => Tag::Image {
            link_type,
            dest_url: CowStr::Borrowed("#"),
            title,
            id,
        },
        other => other,
    }
}

/// `javascript:`, `vbscript:` and `data:` URLs, except `data:image/` for
/// images. Whitespace and control characters are ignored, as browsers do.
fn is_unsafe_destination(url: &str, image: bool) -> bool {
    let scheme: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();

    if scheme.starts_with("javascript:") || scheme.starts_with("vbscript:") {
        return true;
    }
    scheme.starts_with("data:") && !(image && scheme.starts_with("data:image/"))
}

// ============================================================================
// Slot injection
// ============================================================================

/// Renders Markdown into content slots.
pub struct ContentRenderer<'a, R: ?Sized> {
    markdown: &'a R,
    profile: &'a ProfileConfig,
}

impl<'a, R: MarkdownRenderer + ?Sized> ContentRenderer<'a, R> {
    pub fn new(markdown: &'a R, profile: &'a ProfileConfig) -> Self {
        Self { markdown, profile }
    }

    /// Replace the slot's content with the rendered Markdown.
    ///
    /// On error the slot is left exactly as it was.
    pub fn render_into(
        &self,
        dom: &mut Dom,
        slot: NodeId,
        markdown: &str,
    ) -> Result<(), RenderError> {
        let html = self.markdown.render(markdown)?;
        dom.set_inner_html(slot, &html)?;

        if dom.attr(slot, "id") == Some(self.profile.container_id.as_str()) {
            splice_profile_image(dom, slot, self.profile);
        }
        Ok(())
    }
}

/// Split the container at its first top-level child that is or holds an
/// `<h2>`, and put everything before it next to the profile image:
///
/// ```html
/// <div class="profile-with-image">
///   <div class="profile-info">BEFORE</div>
///   <div class="profile-image"><img src="…" alt="…"></div>
///   <div class="clear"></div>
/// </div>AFTER
/// ```
///
/// Returns `false` and changes nothing when there is no `<h2>`.
pub fn splice_profile_image(dom: &mut Dom, container: NodeId, profile: &ProfileConfig) -> bool {
    let children = dom.children(container).to_vec();
    let Some(split) = children.iter().position(|c| dom.contains_tag(*c, "h2")) else {
        return false;
    };
    let (before, after) = children.split_at(split);

    let info = dom.create_element("div", &[("class", "profile-info")]);
    for child in before {
        dom.append_child(info, *child);
    }

    let image = dom.create_element("div", &[("class", "profile-image")]);
    let img = dom.create_element(
        "img",
        &[
            ("src", profile.image_src.as_str()),
            ("alt", profile.image_alt.as_str()),
        ],
    );
    dom.append_child(image, img);

    let clear = dom.create_element("div", &[("class", "clear")]);

    let wrapper = dom.create_element("div", &[("class", "profile-with-image")]);
    for part in [info, image, clear] {
        dom.append_child(wrapper, part);
    }

    dom.append_child(container, wrapper);
    for child in after {
        dom.append_child(container, *child);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::strip_front_matter;

    fn profile() -> ProfileConfig {
        ProfileConfig::default()
    }

    fn render(markdown: &str) -> String {
        CmarkRenderer::default().render(markdown).unwrap()
    }

    #[test]
    fn test_render_basic() {
        assert_eq!(render("# Hi\n\nBody"), "<h1>Hi</h1>\n<p>Body</p>\n");
    }

    #[test]
    fn test_render_extensions() {
        let html = render("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~\n\n- [x] done");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("type=\"checkbox\""));

        let plain = CmarkRenderer::new(MarkdownOptions {
            tables: false,
            strikethrough: false,
            ..MarkdownOptions::default()
        });
        let html = plain.render("~~kept~~").unwrap();
        assert!(!html.contains("<del>"));
    }

    #[test]
    fn test_raw_html_escaped_by_default() {
        let html = render("<script>alert(1)</script>\n\nHello <b>there</b>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&lt;b&gt;there&lt;/b&gt;"));
    }

    #[test]
    fn test_raw_html_allowed_when_unsafe() {
        let renderer = CmarkRenderer::new(MarkdownOptions {
            unsafe_html: true,
            ..MarkdownOptions::default()
        });
        let html = renderer.render("Hello <b>there</b>").unwrap();
        assert!(html.contains("<b>there</b>"));
    }

    #[test]
    fn test_script_urls_neutralized() {
        let html = render("[click](javascript:alert(1)) ![i](javascript:x)");
        assert_eq!(
            html,
            "<p><a href=\"#\">click</a> <img src=\"#\" alt=\"i\" /></p>\n"
        );

        let html = render("[a](JavaScript:x) [b](VBScript:x) [d](data:text/html,x)");
        assert!(!html.to_ascii_lowercase().contains("script:"));
        assert!(!html.contains("data:"));
    }

    #[test]
    fn test_ordinary_urls_kept() {
        let html = render(
            "[site](https://example.org) [p](#papers) [m](mailto:a@b.c) ![x](data:image/png;base64,AA==)",
        );
        assert!(html.contains("href=\"https://example.org\""));
        assert!(html.contains("href=\"#papers\""));
        assert!(html.contains("href=\"mailto:a@b.c\""));
        assert!(html.contains("src=\"data:image/png;base64,AA==\""));
    }

    #[test]
    fn test_script_urls_kept_when_unsafe() {
        let renderer = CmarkRenderer::new(MarkdownOptions {
            unsafe_html: true,
            ..MarkdownOptions::default()
        });
        let html = renderer.render("[x](javascript:go())").unwrap();
        assert!(html.contains("href=\"javascript:go()\""));
    }

    #[test]
    fn test_too_large() {
        let renderer = CmarkRenderer::new(MarkdownOptions {
            max_bytes: 4,
            ..MarkdownOptions::default()
        });
        assert!(renderer.render("tiny").is_ok());
        assert!(matches!(
            renderer.render("too big"),
            Err(RenderError::TooLarge { len: 7, limit: 4 })
        ));
    }

    #[test]
    fn test_render_into_replaces_content() {
        let mut dom = Dom::parse(
            "<div id=\"papers\" data-source=\"p.md\"><p class=\"loading\">Loading...</p></div>",
        )
        .unwrap();
        let slot = dom.get_element_by_id("papers").unwrap();
        let renderer = CmarkRenderer::default();
        let profile = profile();
        let content = ContentRenderer::new(&renderer, &profile);

        content.render_into(&mut dom, slot, "## Papers\n\n1. One").unwrap();
        content.render_into(&mut dom, slot, "## Papers\n\n1. One").unwrap();

        let html = dom.inner_html(slot);
        assert_eq!(html.matches("<h2>Papers</h2>").count(), 1);
        assert!(!html.contains("loading"));
        // Only the profile container gets the image.
        assert!(!html.contains("profile-with-image"));
    }

    #[test]
    fn test_render_error_leaves_slot_untouched() {
        let mut dom = Dom::parse("<div id=\"s\"><p>old</p></div>").unwrap();
        let slot = dom.get_element_by_id("s").unwrap();
        let renderer = CmarkRenderer::new(MarkdownOptions {
            max_bytes: 1,
            ..MarkdownOptions::default()
        });
        let profile = profile();
        let content = ContentRenderer::new(&renderer, &profile);

        assert!(content.render_into(&mut dom, slot, "long text").is_err());
        assert_eq!(dom.inner_html(slot), "<p>old</p>");
    }

    #[test]
    fn test_profile_splice_end_to_end() {
        let mut dom = Dom::parse("<div id=\"profile-content\"></div>").unwrap();
        let slot = dom.get_element_by_id("profile-content").unwrap();
        let renderer = CmarkRenderer::default();
        let profile = profile();
        let content = ContentRenderer::new(&renderer, &profile);

        let source = "---\ntitle: x\n---\n# Hi\n## Career\nBody";
        content
            .render_into(&mut dom, slot, strip_front_matter(source))
            .unwrap();

        let children = dom.children(slot).to_vec();
        let wrapper = children[0];
        assert!(dom.has_class(wrapper, "profile-with-image"));

        let parts = dom.children(wrapper).to_vec();
        assert_eq!(parts.len(), 3);
        assert!(dom.has_class(parts[0], "profile-info"));
        assert!(dom.inner_html(parts[0]).contains("<h1>Hi</h1>"));
        assert!(!dom.contains_tag(parts[0], "h2"));
        assert_eq!(
            dom.inner_html(parts[1]),
            "<img src=\"assets/images/profile.jpg\" alt=\"Profile photo\">"
        );
        assert!(dom.has_class(parts[2], "clear"));

        // The remainder follows the wrapper, starting at the heading.
        assert_eq!(dom.outer_html(children[1]), "<h2>Career</h2>");
        assert!(dom.inner_html(slot).ends_with("<h2>Career</h2>\n<p>Body</p>\n"));
    }

    #[test]
    fn test_profile_without_h2_unchanged() {
        let mut dom = Dom::parse("<div id=\"profile-content\"></div>").unwrap();
        let slot = dom.get_element_by_id("profile-content").unwrap();
        let renderer = CmarkRenderer::default();
        let profile = profile();
        ContentRenderer::new(&renderer, &profile)
            .render_into(&mut dom, slot, "# Hi\n\n### Minor")
            .unwrap();
        assert_eq!(dom.inner_html(slot), "<h1>Hi</h1>\n<h3>Minor</h3>\n");
    }

    #[test]
    fn test_profile_splice_nested_heading() {
        let mut dom = Dom::parse(
            "<div id=\"c\"><p>intro</p><div class=\"x\"><h2>Career</h2></div><p>tail</p></div>",
        )
        .unwrap();
        let slot = dom.get_element_by_id("c").unwrap();
        assert!(splice_profile_image(&mut dom, slot, &profile()));

        let children = dom.children(slot).to_vec();
        assert_eq!(children.len(), 3);
        assert!(dom.has_class(children[1], "x"));
        assert_eq!(dom.outer_html(children[2]), "<p>tail</p>");
    }

    #[test]
    fn test_profile_splice_idempotent_rerender() {
        let mut dom = Dom::parse("<div id=\"profile-content\"></div>").unwrap();
        let slot = dom.get_element_by_id("profile-content").unwrap();
        let renderer = CmarkRenderer::default();
        let profile = profile();
        let content = ContentRenderer::new(&renderer, &profile);

        content.render_into(&mut dom, slot, "# Hi\n## Career").unwrap();
        let first = dom.inner_html(slot);
        content.render_into(&mut dom, slot, "# Hi\n## Career").unwrap();
        assert_eq!(dom.inner_html(slot), first);
        assert_eq!(first.matches("profile-with-image").count(), 1);
    }
}
