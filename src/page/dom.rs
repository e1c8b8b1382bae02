//! Arena-backed HTML tree.
//!
//! Documents are parsed with `tl` and copied into an owned arena so nodes can
//! be mutated, re-parented and queried by ancestry (`closest`), which `tl`'s
//! borrowed tree does not support.
//!
//! Text nodes keep their source form (entities stay encoded); attribute values
//! are stored decoded and re-escaped on serialization.
//!
//! `tl` has no raw-text states, so the bodies of `script`, `style`, `textarea`
//! and `title` are cut out before parsing and stored as one text node each.

use std::borrow::Cow;
use std::fmt::Write as _;

use thiserror::Error;

use crate::utils::html::{escape, is_void_element, unescape};

/// Index of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Error)]
pub enum DomError {
    #[error("failed to parse HTML: {0}")]
    Parse(String),
}

/// An element's tag name and attributes.
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    /// `None` values are bare attributes (`<input disabled>`).
    attrs: Vec<(String, Option<String>)>,
}

impl Element {
    fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    fn set_attr(&mut self, name: &str, value: String) {
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = Some(value),
            None => self.attrs.push((name.to_string(), Some(value))),
        }
    }

    fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(k, _)| k != name);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|c| c.split_ascii_whitespace().any(|c| c == class))
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Element(Element),
    /// Raw text as it appears in HTML source.
    Text(String),
    /// Full comment including `<!--` and `-->`.
    Comment(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Owned, mutable HTML document.
#[derive(Debug, Clone)]
pub struct Dom {
    nodes: Vec<NodeData>,
    root: NodeId,
    doctype: Option<String>,
}

impl Dom {
    /// Parse a full document or a fragment.
    pub fn parse(html: &str) -> Result<Self, DomError> {
        let (doctype, body) = split_doctype(html);
        let mut dom = Self {
            nodes: vec![NodeData {
                kind: NodeKind::Element(Element::new("")),
                parent: None,
                children: Vec::new(),
            }],
            root: NodeId(0),
            doctype: doctype.map(str::to_string),
        };
        let root = dom.root;
        dom.append_parsed(root, body)?;
        Ok(dom)
    }

    pub const fn root(&self) -> NodeId {
        self.root
    }

    // ========================================================================
    // Tree access
    // ========================================================================

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(e) if id != self.root => Some(e),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        if id == self.root {
            return None;
        }
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Parent element (never the synthetic document root).
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|p| *p != self.root)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Descendants of `id` in document order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev());
        }
        out
    }

    /// Whether `id` is still reachable from the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == self.root {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Closest ancestor-or-self element with the given tag.
    pub fn closest(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.tag(node) == Some(tag) {
                return Some(node);
            }
            current = self.parent_element(node);
        }
        None
    }

    /// Whether any strict ancestor element carries `class`.
    pub fn has_ancestor_with_class(&self, id: NodeId, class: &str) -> bool {
        let mut current = self.parent_element(id);
        while let Some(node) = current {
            if self.element(node).is_some_and(|e| e.has_class(class)) {
                return true;
            }
            current = self.parent_element(node);
        }
        false
    }

    // ========================================================================
    // Queries
    // ========================================================================

    fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(self.root)
            .into_iter()
            .filter(move |id| self.element(*id).is_some())
    }

    /// First element in document order with `id="…"`.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.elements()
            .find(|node| self.attr(*node, "id") == Some(id))
    }

    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.elements().filter(|n| self.tag(*n) == Some(tag)).collect()
    }

    pub fn elements_with_attr(&self, name: &str) -> Vec<NodeId> {
        self.elements()
            .filter(|n| self.attr(*n, name).is_some())
            .collect()
    }

    pub fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        self.elements()
            .filter(|n| self.element(*n).is_some_and(|e| e.has_class(class)))
            .collect()
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.attr(name))
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(e) = self.element_mut(id) {
            e.set_attr(name, value.into());
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_class(class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if self.has_class(id, class) {
            return;
        }
        let Some(e) = self.element_mut(id) else {
            return;
        };
        let value = match e.attr("class").map(str::trim) {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        e.set_attr("class", value);
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if !self.has_class(id, class) {
            return;
        }
        let Some(e) = self.element_mut(id) else {
            return;
        };
        let rest: Vec<&str> = e
            .attr("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
            .filter(|c| *c != class)
            .collect();
        if rest.is_empty() {
            e.remove_attr("class");
        } else {
            let value = rest.join(" ");
            e.set_attr("class", value);
        }
    }

    /// Read one inline style property (`style="display: none"`).
    pub fn style_property(&self, id: NodeId, property: &str) -> Option<String> {
        let style = self.attr(id, "style")?;
        style_declarations(style)
            .into_iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(property))
            .map(|(_, v)| v.to_string())
    }

    /// Set one inline style property, keeping the others.
    pub fn set_style_property(&mut self, id: NodeId, property: &str, value: &str) {
        let existing = self.attr(id, "style").unwrap_or_default();
        let mut decls: Vec<String> = style_declarations(existing)
            .into_iter()
            .filter(|(k, _)| !k.eq_ignore_ascii_case(property))
            .map(|(k, v)| format!("{k}: {v}"))
            .collect();
        decls.push(format!("{property}: {value}"));
        self.set_attr(id, "style", decls.join("; "));
    }

    /// `display: none` on the element or any ancestor.
    pub fn is_hidden(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if self
                .style_property(node, "display")
                .is_some_and(|d| d.eq_ignore_ascii_case("none"))
            {
                return true;
            }
            current = self.parent_element(node);
        }
        false
    }

    // ========================================================================
    // Content
    // ========================================================================

    /// Replace all children with a single text node.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        self.detach_children(id);
        self.push(NodeKind::Text(escape(text).into_owned()), id);
    }

    /// Concatenated, entity-decoded text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            if let NodeKind::Text(t) = self.kind(node) {
                out.push_str(&unescape(t));
            }
        }
        out
    }

    /// Replace all children with parsed markup (full replace, never append).
    ///
    /// On parse failure the existing children are left in place.
    pub fn set_inner_html(&mut self, id: NodeId, html: &str) -> Result<(), DomError> {
        let fragment = Self::parse(html)?;
        self.detach_children(id);
        let children = fragment.children(fragment.root).to_vec();
        for child in children {
            self.adopt(&fragment, child, id);
        }
        Ok(())
    }

    /// New element outside the tree; attach it with [`Dom::append_child`].
    pub fn create_element(&mut self, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut element = Element::new(tag);
        for (key, value) in attrs {
            element.set_attr(key, (*value).to_string());
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind: NodeKind::Element(element),
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Move `child` to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(old) = self.nodes[child.0].parent {
            self.nodes[old.0].children.retain(|c| *c != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Whether `id` is, or contains, an element with `tag`.
    pub fn contains_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag(id) == Some(tag)
            || self
                .descendants(id)
                .into_iter()
                .any(|n| self.tag(n) == Some(tag))
    }

    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.write_node(*child, &mut out);
        }
        out
    }

    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Serialize the whole document, doctype included.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        if let Some(doctype) = &self.doctype {
            out.push_str(doctype);
        }
        out.push_str(&self.inner_html(self.root));
        out
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn push(&mut self, kind: NodeKind, parent: NodeId) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    fn detach_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    /// Deep-copy a node from another arena under `parent`.
    fn adopt(&mut self, other: &Dom, node: NodeId, parent: NodeId) {
        let id = self.push(other.kind(node).clone(), parent);
        for child in other.children(node) {
            self.adopt(other, *child, id);
        }
    }

    fn append_parsed(&mut self, parent: NodeId, html: &str) -> Result<(), DomError> {
        let (prepared, bodies) = extract_raw_text(html);
        let vdom = tl::parse(&prepared, tl::ParserOptions::default())
            .map_err(|e| DomError::Parse(format!("{e:?}")))?;
        let parser = vdom.parser();
        for handle in vdom.children() {
            self.import(*handle, parser, parent, &bodies);
        }
        Ok(())
    }

    /// Copy a `tl` node (and its subtree) into the arena.
    fn import(
        &mut self,
        handle: tl::NodeHandle,
        parser: &tl::Parser,
        parent: NodeId,
        bodies: &[&str],
    ) {
        let Some(node) = handle.get(parser) else {
            return;
        };

        match node {
            tl::Node::Tag(tag) => {
                let name = tag.name().as_utf8_str().to_ascii_lowercase();
                let void = is_void_element(&name);
                let mut element = Element::new(name);
                let mut raw_body = None;
                for (key, value) in tag.attributes().iter() {
                    let key = key.to_ascii_lowercase();
                    if key == RAW_TEXT_ATTR {
                        raw_body = value
                            .and_then(|v| v.parse::<usize>().ok())
                            .and_then(|i| bodies.get(i).copied());
                        continue;
                    }
                    if element.attrs.iter().any(|(k, _)| *k == key) {
                        continue;
                    }
                    let value = value.map(|v| unescape(&v).into_owned());
                    element.attrs.push((key, value));
                }

                let id = self.push(NodeKind::Element(element), parent);
                if let Some(body) = raw_body {
                    if !body.is_empty() {
                        self.push(NodeKind::Text(body.to_string()), id);
                    }
                    return;
                }
                // Content a lenient parser nests under a void tag belongs after it.
                let container = if void { parent } else { id };
                for child in tag.children().top().iter() {
                    self.import(*child, parser, container, bodies);
                }
            }
            tl::Node::Raw(bytes) => {
                let text = bytes.as_utf8_str().into_owned();
                if !text.is_empty() {
                    self.push(NodeKind::Text(text), parent);
                }
            }
            tl::Node::Comment(bytes) => {
                let raw = bytes.as_utf8_str();
                let comment = if raw.starts_with("<!--") {
                    raw.into_owned()
                } else {
                    format!("<!--{raw}-->")
                };
                self.push(NodeKind::Comment(comment), parent);
            }
        }
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Comment(comment) => out.push_str(comment),
            NodeKind::Element(_) if id == self.root => {
                for child in self.children(id) {
                    self.write_node(*child, out);
                }
            }
            NodeKind::Element(e) => {
                out.push('<');
                out.push_str(&e.tag);
                for (key, value) in &e.attrs {
                    match value {
                        Some(v) => {
                            let _ = write!(out, " {key}=\"{}\"", escape(v));
                        }
                        None => {
                            let _ = write!(out, " {key}");
                        }
                    }
                }
                out.push('>');

                if is_void_element(&e.tag) {
                    return;
                }

                // Text, including raw-text bodies, is stored in source form.
                for child in self.children(id) {
                    self.write_node(*child, out);
                }
                let _ = write!(out, "</{}>", e.tag);
            }
        }
    }
}

/// Elements whose content is never markup.
const RAW_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "textarea", "title"];

/// Marker linking an emptied raw-text element to its stashed body.
const RAW_TEXT_ATTR: &str = "data-dom-raw-text";

/// Empty every raw-text element and return its body, in source order.
///
/// Each emptied element is tagged with [`RAW_TEXT_ATTR`] holding the index of
/// its body. Comments are skipped. An unclosed element runs to the end.
fn extract_raw_text(html: &str) -> (Cow<'_, str>, Vec<&str>) {
    // ASCII lowercasing keeps byte offsets.
    let lower = html.to_ascii_lowercase();
    let mut out = String::new();
    let mut bodies = Vec::new();
    let mut copied = 0;
    let mut pos = 0;

    while let Some(rel) = lower[pos..].find('<') {
        let start = pos + rel;
        let rest = &lower[start + 1..];

        if rest.starts_with("!--") {
            match lower[start..].find("-->") {
                Some(end) => {
                    pos = start + end + 3;
                    continue;
                }
                None => break,
            }
        }

        let Some(name) = RAW_TEXT_ELEMENTS.iter().find(|name| {
            rest.strip_prefix(**name).is_some_and(|after| {
                after.starts_with(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
            })
        }) else {
            pos = start + 1;
            continue;
        };

        let name_end = start + 1 + name.len();
        let Some(open_end) = tag_end(&lower, name_end) else {
            break;
        };
        let close = lower[open_end..]
            .find(&format!("</{name}"))
            .map_or(html.len(), |c| open_end + c);

        out.push_str(&html[copied..name_end]);
        let _ = write!(out, " {RAW_TEXT_ATTR}=\"{}\"", bodies.len());
        out.push_str(&html[name_end..open_end]);
        bodies.push(&html[open_end..close]);
        copied = close;
        pos = close;
    }

    if bodies.is_empty() {
        return (Cow::Borrowed(html), bodies);
    }
    out.push_str(&html[copied..]);
    (Cow::Owned(out), bodies)
}

/// Offset just past the `>` closing a start tag, honoring quoted values.
fn tag_end(html: &str, from: usize) -> Option<usize> {
    let mut quote = None;
    for (i, b) in html.bytes().enumerate().skip(from) {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Some(i + 1),
            (None, _) => {}
        }
    }
    None
}

/// Split a leading `<!DOCTYPE …>` off the document.
fn split_doctype(html: &str) -> (Option<&str>, &str) {
    let trimmed = html.trim_start();
    let offset = html.len() - trimmed.len();
    if trimmed
        .get(..9)
        .is_some_and(|head| head.eq_ignore_ascii_case("<!doctype"))
        && let Some(end) = trimmed.find('>')
    {
        let split = offset + end + 1;
        return (Some(&html[..split]), &html[split..]);
    }
    (None, html)
}

/// Parse `a: b; c: d` into trimmed pairs, skipping malformed entries.
fn style_declarations(style: &str) -> Vec<(&str, &str)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (k, v) = decl.split_once(':')?;
            let (k, v) = (k.trim(), v.trim());
            (!k.is_empty()).then_some((k, v))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"<!DOCTYPE html>
<html><body>
<nav class="sidebar"><ul><li><a href="#profile">Profile</a></li></ul></nav>
<section id="profile"><div id="profile-content" class="markdown-content" data-source="_auto_contents/profile.md"><p class="loading">Loading...</p></div></section>
</body></html>"##;

    #[test]
    fn test_parse_and_query_by_id() {
        let dom = Dom::parse(PAGE).unwrap();
        let slot = dom.get_element_by_id("profile-content").unwrap();
        assert_eq!(dom.tag(slot), Some("div"));
        assert_eq!(
            dom.attr(slot, "data-source"),
            Some("_auto_contents/profile.md")
        );
        assert!(dom.get_element_by_id("missing").is_none());
        assert!(dom.get_element_by_id("").is_none());
    }

    #[test]
    fn test_closest_includes_self() {
        let dom = Dom::parse(PAGE).unwrap();
        let slot = dom.get_element_by_id("profile-content").unwrap();
        let section = dom.closest(slot, "section").unwrap();
        assert_eq!(dom.attr(section, "id"), Some("profile"));
        assert_eq!(dom.closest(section, "section"), Some(section));
        assert!(dom.closest(slot, "article").is_none());
    }

    #[test]
    fn test_doctype_roundtrip() {
        let dom = Dom::parse(PAGE).unwrap();
        let html = dom.to_html();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r##"<a href="#profile">Profile</a>"##));
    }

    #[test]
    fn test_set_inner_html_replaces_children() {
        let mut dom = Dom::parse(PAGE).unwrap();
        let slot = dom.get_element_by_id("profile-content").unwrap();
        let loading = dom.elements_with_class("loading");
        assert_eq!(loading.len(), 1);

        dom.set_inner_html(slot, "<h1>Hi</h1>").unwrap();
        assert_eq!(dom.inner_html(slot), "<h1>Hi</h1>");
        assert!(!dom.is_attached(loading[0]));
        assert!(dom.elements_with_class("loading").is_empty());

        dom.set_inner_html(slot, "<h1>Hi</h1>").unwrap();
        assert_eq!(dom.inner_html(slot), "<h1>Hi</h1>");
    }

    #[test]
    fn test_set_text_escapes() {
        let mut dom = Dom::parse("<span id=\"x\">old</span>").unwrap();
        let x = dom.get_element_by_id("x").unwrap();
        dom.set_text(x, "a < b");
        assert_eq!(dom.inner_html(x), "a &lt; b");
        assert_eq!(dom.text_content(x), "a < b");
    }

    #[test]
    fn test_class_mutation() {
        let mut dom = Dom::parse("<a id=\"l\" class=\"nav\">x</a>").unwrap();
        let link = dom.get_element_by_id("l").unwrap();
        dom.add_class(link, "active");
        dom.add_class(link, "active");
        assert_eq!(dom.attr(link, "class"), Some("nav active"));
        dom.remove_class(link, "active");
        assert_eq!(dom.attr(link, "class"), Some("nav"));
        dom.remove_class(link, "nav");
        assert_eq!(dom.attr(link, "class"), None);
    }

    #[test]
    fn test_style_property_merge() {
        let mut dom = Dom::parse("<li id=\"i\" style=\"color: red\">x</li>").unwrap();
        let li = dom.get_element_by_id("i").unwrap();
        assert!(!dom.is_hidden(li));
        dom.set_style_property(li, "display", "none");
        dom.set_style_property(li, "display", "none");
        assert_eq!(dom.attr(li, "style"), Some("color: red; display: none"));
        assert!(dom.is_hidden(li));
    }

    #[test]
    fn test_hidden_is_inherited() {
        let mut dom = Dom::parse("<section id=\"s\"><p id=\"p\">x</p></section>").unwrap();
        let section = dom.get_element_by_id("s").unwrap();
        let p = dom.get_element_by_id("p").unwrap();
        dom.set_style_property(section, "display", "none");
        assert!(dom.is_hidden(p));
    }

    #[test]
    fn test_ancestor_class() {
        let dom = Dom::parse(PAGE).unwrap();
        let link = dom.elements_by_tag("a")[0];
        assert!(dom.has_ancestor_with_class(link, "sidebar"));
        let slot = dom.get_element_by_id("profile-content").unwrap();
        assert!(!dom.has_ancestor_with_class(slot, "sidebar"));
    }

    #[test]
    fn test_attribute_entities_decoded() {
        let dom = Dom::parse("<a id=\"l\" href=\"#a&amp;b\">x</a>").unwrap();
        let link = dom.get_element_by_id("l").unwrap();
        assert_eq!(dom.attr(link, "href"), Some("#a&b"));
        assert!(dom.outer_html(link).contains("href=\"#a&amp;b\""));
    }

    #[test]
    fn test_void_elements_not_closed() {
        let dom = Dom::parse("<p>a<br>b</p>").unwrap();
        assert_eq!(dom.to_html(), "<p>a<br>b</p>");
    }

    #[test]
    fn test_script_body_kept_verbatim() {
        let html = "<body><script>for (let i = 0; i<n; i++) {}</script>\
                    <section id=\"p\"><div data-source=\"p.md\"></div></section></body>";
        let dom = Dom::parse(html).unwrap();
        assert_eq!(dom.to_html(), html);

        let section = dom.get_element_by_id("p").unwrap();
        assert!(dom.closest(section, "script").is_none());
        let script = dom.elements_by_tag("script")[0];
        assert_eq!(dom.children(script).len(), 1);
    }

    #[test]
    fn test_raw_text_elements_roundtrip() {
        for html in [
            "<script>for(i=0;i<n;i++){}</script>",
            "<script type=\"module\">const s = '</p>'; if (a<b) {}</script><p>after</p>",
            "<style>a > b { content: \"<x>\"; }</style>",
            "<textarea name=\"t\"><b>not bold</b></textarea>",
            "<title>a < b</title>",
            "<script src=\"a.js\"></script><script>x<y</script>",
        ] {
            let dom = Dom::parse(html).unwrap();
            assert_eq!(dom.to_html(), html);
            assert!(!dom.to_html().contains(RAW_TEXT_ATTR));
        }

        let dom = Dom::parse("<script>const s = '</p>';</script><p>after</p>").unwrap();
        assert_eq!(dom.elements_by_tag("p").len(), 1);
    }

    #[test]
    fn test_raw_text_in_comment_ignored() {
        let html = "<!-- <script> --><p>a<b>c</b></p>";
        let dom = Dom::parse(html).unwrap();
        assert_eq!(dom.elements_by_tag("b").len(), 1);
        assert!(dom.elements_by_tag("script").is_empty());
    }

    #[test]
    fn test_set_inner_html_with_script() {
        let mut dom = Dom::parse("<div id=\"slot\"></div>").unwrap();
        let slot = dom.get_element_by_id("slot").unwrap();
        dom.set_inner_html(slot, "<script>if (a<b) {}</script><p>x</p>")
            .unwrap();
        assert_eq!(
            dom.inner_html(slot),
            "<script>if (a<b) {}</script><p>x</p>"
        );
    }

    #[test]
    fn test_create_and_move_nodes() {
        let mut dom = Dom::parse("<div id=\"c\"><h1>A</h1><h2>B</h2></div>").unwrap();
        let container = dom.get_element_by_id("c").unwrap();
        let h1 = dom.children(container)[0];
        let wrapper = dom.create_element("div", &[("class", "info")]);
        assert!(!dom.is_attached(wrapper));

        dom.append_child(wrapper, h1);
        dom.append_child(container, wrapper);
        assert_eq!(
            dom.inner_html(container),
            "<h2>B</h2><div class=\"info\"><h1>A</h1></div>"
        );
        assert!(dom.contains_tag(wrapper, "h1"));
        assert!(!dom.contains_tag(wrapper, "h2"));
    }
}
