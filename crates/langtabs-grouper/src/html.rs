//! HTML host backed by an html5ever DOM.
//!
//! [`HtmlPage`] parses rendered HTML into a `markup5ever_rcdom` tree,
//! implements [`ContentTree`] and [`TabHost`] over it, and serializes the
//! mutated tree back to HTML.
//!
//! Markers are class tokens. Visibility is the inline `display` declaration,
//! so a hidden container reads `style="display: none"` and a shown one has no
//! `display` declaration at all.
//!
//! Tab items switch panels in the browser through one delegated click
//! handler, installed with [`HtmlPage::install_tab_script`].

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::serialize::SerializeOpts;
use html5ever::{Attribute, LocalName, ParseOpts, QualName, ns, parse_document, serialize};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};

use crate::host::{ContentTree, TAB_ITEM_MARKER, TAB_STRIP_MARKER, TabHost};

/// `id` of the inline script that makes tab strips switchable.
pub const TAB_SCRIPT_ID: &str = "lang-tabs-script";

/// Delegated click handler: selecting an item marks it active and shows only
/// the panel at the same position after the strip.
const TAB_SCRIPT: &str = include_str!("../assets/tab-switch.js");

/// Error returned when a page cannot be serialized.
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("HTML serialization failed: {0}")]
    Serialize(#[from] std::io::Error),
    #[error("serialized HTML is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Handle to an element of an [`HtmlPage`].
///
/// Two handles are equal when they point to the same node.
#[derive(Clone)]
pub struct HtmlElement(Handle);

impl HtmlElement {
    /// Local tag name (e.g. `pre`).
    #[must_use]
    pub fn tag_name(&self) -> Option<String> {
        match &self.0.data {
            NodeData::Element { name, .. } => Some(name.local.to_string()),
            _ => None,
        }
    }

    /// Value of an attribute.
    #[must_use]
    pub fn attr(&self, attr_name: &str) -> Option<String> {
        match &self.0.data {
            NodeData::Element { attrs, .. } => attrs
                .borrow()
                .iter()
                .find(|a| &*a.name.local == attr_name)
                .map(|a| a.value.to_string()),
            _ => None,
        }
    }

    /// Concatenated text of all descendant text nodes.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.0, &mut out);
        out
    }

    /// Set an attribute, or remove it when `value` is `None`.
    fn set_attr(&self, attr_name: &str, value: Option<&str>) {
        let NodeData::Element { attrs, .. } = &self.0.data else {
            return;
        };
        let mut attrs = attrs.borrow_mut();
        let pos = attrs.iter().position(|a| &*a.name.local == attr_name);
        match (pos, value) {
            (Some(pos), Some(value)) => attrs[pos].value = StrTendril::from(value),
            (Some(pos), None) => {
                attrs.remove(pos);
            }
            (None, Some(value)) => attrs.push(Attribute {
                name: QualName::new(None, ns!(), LocalName::from(attr_name)),
                value: StrTendril::from(value),
            }),
            (None, None) => {}
        }
    }
}

impl PartialEq for HtmlElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for HtmlElement {}

impl fmt::Debug for HtmlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlElement")
            .field("tag", &self.tag_name())
            .field("class", &self.attr("class"))
            .finish()
    }
}

/// Whether the parsed input was a complete document or a body fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PageKind {
    Document,
    Fragment,
}

/// Rendered HTML page, parsed into a mutable DOM.
///
/// # Example
///
/// ```
/// use langtabs_grouper::{HtmlPage, group_and_tab};
///
/// let page = HtmlPage::parse(
///     r#"<pre><code class="language-json">{}</code></pre><pre><code class="language-toml"></code></pre>"#,
/// );
/// let controls = group_and_tab(&page, ["JSON", "TOML"]);
/// assert_eq!(controls.len(), 1);
///
/// let html = page.to_html().unwrap();
/// assert!(html.starts_with(r#"<div class="lang-tabs">"#));
/// ```
pub struct HtmlPage {
    dom: RcDom,
    kind: PageKind,
}

impl HtmlPage {
    /// Parse rendered HTML.
    ///
    /// Input starting with a doctype or an `<html>` tag is treated as a full
    /// document; anything else as the content of `<body>`. Parsing never
    /// fails: html5ever recovers from malformed markup like a browser does.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        let kind = detect_kind(html);
        let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
        Self { dom, kind }
    }

    /// Serialize the page.
    ///
    /// A full document is serialized as a document, a fragment as the
    /// children of `<body>` only.
    pub fn to_html(&self) -> Result<String, HtmlError> {
        let root = match self.kind {
            PageKind::Document => Some(self.dom.document.clone()),
            PageKind::Fragment => find_element(&self.dom.document, "body"),
        };
        let Some(root) = root else {
            return Ok(String::new());
        };

        let mut output = Vec::new();
        let serializable = SerializableHandle::from(root);
        serialize(&mut output, &serializable, SerializeOpts::default())?;
        Ok(String::from_utf8(output)?)
    }

    /// Append the tab switching script to the end of `<body>`.
    ///
    /// A page holds at most one copy: returns `false` when the script is
    /// already present (e.g. the page was processed before).
    pub fn install_tab_script(&self) -> bool {
        if find_by_id(&self.dom.document, TAB_SCRIPT_ID).is_some() {
            return false;
        }
        let Some(body) = find_element(&self.dom.document, "body") else {
            return false;
        };
        let script = create_element("script", &[("id", TAB_SCRIPT_ID)]);
        append_child(&script, create_text(TAB_SCRIPT));
        append_child(&body, script);
        true
    }
}

impl fmt::Debug for HtmlPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlPage").field("kind", &self.kind).finish_non_exhaustive()
    }
}

impl ContentTree for HtmlPage {
    type Element = HtmlElement;

    fn code_elements(&self) -> Vec<HtmlElement> {
        let mut found = Vec::new();
        collect_elements(&self.dom.document, "code", &mut found);
        found.into_iter().map(HtmlElement).collect()
    }

    fn class_name(&self, element: &HtmlElement) -> Option<String> {
        element.attr("class")
    }

    fn parent_element(&self, element: &HtmlElement) -> Option<HtmlElement> {
        parent_of(&element.0)
            .filter(|parent| matches!(parent.data, NodeData::Element { .. }))
            .map(HtmlElement)
    }

    fn next_element_sibling(&self, element: &HtmlElement) -> Option<HtmlElement> {
        let parent = parent_of(&element.0)?;
        let children = parent.children.borrow();
        let pos = children.iter().position(|c| Rc::ptr_eq(c, &element.0))?;
        children[pos + 1..]
            .iter()
            .find(|c| matches!(c.data, NodeData::Element { .. }))
            .cloned()
            .map(HtmlElement)
    }

    fn previous_element_sibling(&self, element: &HtmlElement) -> Option<HtmlElement> {
        let parent = parent_of(&element.0)?;
        let children = parent.children.borrow();
        let pos = children.iter().position(|c| Rc::ptr_eq(c, &element.0))?;
        children[..pos]
            .iter()
            .rev()
            .find(|c| matches!(c.data, NodeData::Element { .. }))
            .cloned()
            .map(HtmlElement)
    }

    fn has_marker(&self, element: &HtmlElement, marker: &str) -> bool {
        element
            .attr("class")
            .is_some_and(|class| class.split_ascii_whitespace().any(|t| t == marker))
    }

    fn set_marker(&self, element: &HtmlElement, marker: &str, on: bool) {
        let class = element.attr("class").unwrap_or_default();
        let mut tokens: Vec<&str> = class
            .split_ascii_whitespace()
            .filter(|t| *t != marker)
            .collect();
        if on {
            tokens.push(marker);
        }
        let updated = tokens.join(" ");
        if updated == class {
            return;
        }
        element.set_attr("class", (!updated.is_empty()).then_some(updated.as_str()));
    }
}

impl TabHost for HtmlPage {
    fn insert_tab_strip(&self, anchor: &HtmlElement) -> Option<HtmlElement> {
        let parent = parent_of(&anchor.0)?;
        let strip = create_element("div", &[("class", TAB_STRIP_MARKER)]);

        let mut children = parent.children.borrow_mut();
        let pos = children.iter().position(|c| Rc::ptr_eq(c, &anchor.0))?;
        strip.parent.set(Some(Rc::downgrade(&parent)));
        children.insert(pos, strip.clone());
        Some(HtmlElement(strip))
    }

    fn remove_element(&self, element: &HtmlElement) {
        if let Some(parent) = parent_of(&element.0) {
            parent
                .children
                .borrow_mut()
                .retain(|c| !Rc::ptr_eq(c, &element.0));
        }
        element.0.parent.set(None);
    }

    fn append_tab_item(&self, strip: &HtmlElement, label: &str) -> HtmlElement {
        let item = create_element("span", &[("class", TAB_ITEM_MARKER)]);
        append_child(&item, create_text(label));
        append_child(&strip.0, item.clone());
        HtmlElement(item)
    }

    fn is_visible(&self, element: &HtmlElement) -> bool {
        let style = element.attr("style").unwrap_or_default();
        !declarations(&style).any(|(property, value)| property == "display" && value == "none")
    }

    fn set_visible(&self, element: &HtmlElement, visible: bool) {
        let style = element.attr("style").unwrap_or_default();
        let mut kept: Vec<String> = declarations(&style)
            .filter(|(property, _)| property != "display")
            .map(|(property, value)| format!("{property}: {value}"))
            .collect();
        if !visible {
            kept.push("display: none".to_owned());
        }
        let updated = kept.join("; ");
        element.set_attr("style", (!updated.is_empty()).then_some(updated.as_str()));
    }
}

/// Parsed inline style declarations as `(property, value)`, property lowercased.
fn declarations(style: &str) -> impl Iterator<Item = (String, String)> + '_ {
    style.split(';').filter_map(|decl| {
        let (property, value) = decl.split_once(':')?;
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim().to_owned();
        (!property.is_empty()).then_some((property, value))
    })
}

fn detect_kind(html: &str) -> PageKind {
    let head = html.trim_start().as_bytes();
    let starts_with = |prefix: &[u8]| {
        head.get(..prefix.len())
            .is_some_and(|start| start.eq_ignore_ascii_case(prefix))
    };
    if starts_with(b"<!doctype") || starts_with(b"<html") {
        PageKind::Document
    } else {
        PageKind::Fragment
    }
}

/// Parent of a node, read through its weak back-pointer.
fn parent_of(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take()?;
    let parent = weak.upgrade();
    node.parent.set(Some(weak));
    parent
}

fn append_child(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// Collect elements named `local` in document order.
fn collect_elements(node: &Handle, local: &str, out: &mut Vec<Handle>) {
    if let NodeData::Element { name, .. } = &node.data
        && &*name.local == local
    {
        out.push(node.clone());
    }
    for child in node.children.borrow().iter() {
        collect_elements(child, local, out);
    }
}

fn find_element(node: &Handle, local: &str) -> Option<Handle> {
    if let NodeData::Element { name, .. } = &node.data
        && &*name.local == local
    {
        return Some(node.clone());
    }
    node.children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, local))
}

fn find_by_id(node: &Handle, id: &str) -> Option<Handle> {
    if HtmlElement(node.clone()).attr("id").as_deref() == Some(id) {
        return Some(node.clone());
    }
    node.children
        .borrow()
        .iter()
        .find_map(|child| find_by_id(child, id))
}

fn collect_text(node: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &node.data {
        out.push_str(&contents.borrow());
    }
    for child in node.children.borrow().iter() {
        collect_text(child, out);
    }
}

fn create_element(tag: &str, attrs: &[(&str, &str)]) -> Handle {
    let attributes = attrs
        .iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(*name)),
            value: StrTendril::from(*value),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: QualName::new(None, ns!(html), LocalName::from(tag)),
            attrs: RefCell::new(attributes),
            template_contents: RefCell::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(StrTendril::from(text)),
        },
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::host::{ACTIVE_MARKER, TABBED_MARKER};

    const THREE: &str = concat!(
        r#"<pre><code class="language-hjson">a: 1</code></pre>"#,
        "\n",
        r#"<pre><code class="language-json">{"a": 1}</code></pre>"#,
        "\n",
        r#"<pre><code class="language-toml">a = 1</code></pre>"#,
    );

    fn containers(page: &HtmlPage) -> Vec<HtmlElement> {
        page.code_elements()
            .iter()
            .filter_map(|code| page.parent_element(code))
            .collect()
    }

    #[test]
    fn test_fragment_round_trip_is_unchanged() {
        let page = HtmlPage::parse(THREE);
        assert_eq!(page.to_html().unwrap(), THREE);
    }

    #[test]
    fn test_document_round_trip_keeps_doctype() {
        let html = "<!DOCTYPE html><html><head><title>T</title></head><body><p>x</p></body></html>";
        let page = HtmlPage::parse(html);
        assert_eq!(page.to_html().unwrap(), html);
    }

    #[test]
    fn test_detect_kind() {
        assert_eq!(detect_kind("  <!doctype html><p>"), PageKind::Document);
        assert_eq!(detect_kind("<HTML lang=en>"), PageKind::Document);
        assert_eq!(detect_kind("<p>text</p>"), PageKind::Fragment);
        assert_eq!(detect_kind(""), PageKind::Fragment);
    }

    #[test]
    fn test_code_elements_and_classes() {
        let page = HtmlPage::parse(THREE);
        let classes: Vec<_> = page
            .code_elements()
            .iter()
            .filter_map(|c| page.class_name(c))
            .collect();
        assert_eq!(classes, ["language-hjson", "language-json", "language-toml"]);
    }

    #[test]
    fn test_next_element_sibling_skips_text() {
        let page = HtmlPage::parse(THREE);
        let pres = containers(&page);
        assert_eq!(page.next_element_sibling(&pres[0]), Some(pres[1].clone()));
        assert_eq!(page.next_element_sibling(&pres[1]), Some(pres[2].clone()));
        assert_eq!(page.next_element_sibling(&pres[2]), None);
    }

    #[test]
    fn test_previous_element_sibling_skips_text() {
        let page = HtmlPage::parse(THREE);
        let pres = containers(&page);
        assert_eq!(page.previous_element_sibling(&pres[2]), Some(pres[1].clone()));
        assert_eq!(page.previous_element_sibling(&pres[0]), None);
    }

    #[test]
    fn test_remove_element() {
        let page = HtmlPage::parse(THREE);
        let pres = containers(&page);

        page.remove_element(&pres[1]);

        assert_eq!(page.next_element_sibling(&pres[0]), Some(pres[2].clone()));
        assert_eq!(page.parent_element(&pres[1]), None);
        assert_eq!(page.code_elements().len(), 2);
    }

    #[test]
    fn test_install_tab_script_once() {
        let page = HtmlPage::parse("<p>x</p>");

        assert!(page.install_tab_script());
        assert!(!page.install_tab_script());

        let html = page.to_html().unwrap();
        assert!(html.starts_with(r#"<p>x</p><script id="lang-tabs-script">"#));
        assert!(html.contains(".lang-tabs > .lang-tab"));
        assert_eq!(html.matches("<script").count(), 1);

        let reparsed = HtmlPage::parse(&html);
        assert!(!reparsed.install_tab_script());
        assert_eq!(reparsed.to_html().unwrap(), html);
    }

    #[test]
    fn test_install_tab_script_in_document_body() {
        let page = HtmlPage::parse("<!DOCTYPE html><html><head></head><body><p>x</p></body></html>");
        assert!(page.install_tab_script());
        let html = page.to_html().unwrap();
        assert!(html.contains(r#"<p>x</p><script id="lang-tabs-script">"#));
        assert!(html.ends_with("</script></body></html>"));
    }

    #[test]
    fn test_next_element_sibling_skips_comments() {
        let page = HtmlPage::parse(
            r#"<pre><code class="json"></code></pre><!-- x --><pre><code class="toml"></code></pre>"#,
        );
        let pres = containers(&page);
        assert_eq!(page.next_element_sibling(&pres[0]), Some(pres[1].clone()));
    }

    #[test]
    fn test_set_marker_preserves_other_classes() {
        let page = HtmlPage::parse(r#"<pre class="highlight"><code></code></pre>"#);
        let pre = containers(&page).remove(0);

        page.set_marker(&pre, TABBED_MARKER, true);
        page.set_marker(&pre, TABBED_MARKER, true);
        assert_eq!(pre.attr("class").as_deref(), Some("highlight tabbed"));
        assert!(page.has_marker(&pre, TABBED_MARKER));

        page.set_marker(&pre, TABBED_MARKER, false);
        assert_eq!(pre.attr("class").as_deref(), Some("highlight"));
    }

    #[test]
    fn test_set_marker_removes_empty_class() {
        let page = HtmlPage::parse("<pre><code></code></pre>");
        let pre = containers(&page).remove(0);

        page.set_marker(&pre, ACTIVE_MARKER, true);
        page.set_marker(&pre, ACTIVE_MARKER, false);
        assert_eq!(pre.attr("class"), None);
    }

    #[test]
    fn test_visibility_preserves_other_styles() {
        let page = HtmlPage::parse(r#"<pre style="color: red"><code></code></pre>"#);
        let pre = containers(&page).remove(0);
        assert!(page.is_visible(&pre));

        page.set_visible(&pre, false);
        assert_eq!(pre.attr("style").as_deref(), Some("color: red; display: none"));
        assert!(!page.is_visible(&pre));

        page.set_visible(&pre, false);
        assert_eq!(pre.attr("style").as_deref(), Some("color: red; display: none"));

        page.set_visible(&pre, true);
        assert_eq!(pre.attr("style").as_deref(), Some("color: red"));
        assert!(page.is_visible(&pre));
    }

    #[test]
    fn test_show_removes_empty_style() {
        let page = HtmlPage::parse(r#"<pre style="DISPLAY:none"><code></code></pre>"#);
        let pre = containers(&page).remove(0);
        assert!(!page.is_visible(&pre));

        page.set_visible(&pre, true);
        assert_eq!(pre.attr("style"), None);
    }

    #[test]
    fn test_insert_tab_strip_and_items() {
        let page = HtmlPage::parse("<p>intro</p><pre><code></code></pre>");
        let pre = containers(&page).remove(0);

        let strip = page.insert_tab_strip(&pre).unwrap();
        let item = page.append_tab_item(&strip, "<TOML>");

        assert_eq!(page.next_element_sibling(&strip), Some(pre));
        assert_eq!(page.parent_element(&item), Some(strip));
        assert_eq!(item.text(), "<TOML>");
        assert_eq!(
            page.to_html().unwrap(),
            r#"<p>intro</p><div class="lang-tabs"><span class="lang-tab">&lt;TOML&gt;</span></div><pre><code></code></pre>"#
        );
    }

    #[test]
    fn test_element_identity() {
        let page = HtmlPage::parse("<pre><code></code></pre><pre><code></code></pre>");
        let pres = containers(&page);
        assert_eq!(pres[0], pres[0].clone());
        assert_ne!(pres[0], pres[1]);
    }
}
