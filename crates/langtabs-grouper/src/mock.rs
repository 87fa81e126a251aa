//! In-memory content tree for testing.
//!
//! Provides [`MockTree`], a minimal arena-backed element tree implementing
//! [`ContentTree`] and [`TabHost`] without parsing any HTML.

use std::cell::RefCell;
use std::collections::BTreeSet;

use crate::host::{ContentTree, TAB_ITEM_MARKER, TAB_STRIP_MARKER, TabHost};

/// Handle to a node of a [`MockTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MockElement(usize);

#[derive(Debug)]
struct MockNode {
    tag: String,
    class_name: Option<String>,
    text: String,
    parent: Option<usize>,
    children: Vec<usize>,
    markers: BTreeSet<String>,
    hidden: bool,
}

impl MockNode {
    fn new(tag: &str, class_name: Option<&str>, parent: Option<usize>) -> Self {
        Self {
            tag: tag.to_owned(),
            class_name: class_name.map(str::to_owned),
            text: String::new(),
            parent,
            children: Vec::new(),
            markers: BTreeSet::new(),
            hidden: false,
        }
    }
}

/// Mock content tree for testing.
///
/// The tree starts with a single root element. Use the builder methods to
/// append content under it.
#[derive(Debug)]
pub struct MockTree {
    nodes: RefCell<Vec<MockNode>>,
}

impl Default for MockTree {
    fn default() -> Self {
        Self {
            nodes: RefCell::new(vec![MockNode::new("root", None, None)]),
        }
    }
}

impl MockTree {
    /// Create a tree containing only the root element.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The root element.
    #[must_use]
    pub fn root(&self) -> MockElement {
        MockElement(0)
    }

    /// Append an element under `parent` and return it.
    pub fn append(&self, parent: MockElement, tag: &str, class_name: Option<&str>) -> MockElement {
        let mut nodes = self.nodes.borrow_mut();
        let id = nodes.len();
        nodes.push(MockNode::new(tag, class_name, Some(parent.0)));
        nodes[parent.0].children.push(id);
        MockElement(id)
    }

    /// Append a `pre > code` pair under the root and return the `pre` container.
    pub fn code_block(&self, class_name: &str) -> MockElement {
        self.code_block_in(self.root(), class_name)
    }

    /// Append a `pre > code` pair under `parent` and return the `pre` container.
    pub fn code_block_in(&self, parent: MockElement, class_name: &str) -> MockElement {
        let pre = self.append(parent, "pre", None);
        self.append(pre, "code", Some(class_name));
        pre
    }

    /// Append a paragraph under the root.
    pub fn paragraph(&self) -> MockElement {
        self.append(self.root(), "p", None)
    }

    /// Children of an element.
    #[must_use]
    pub fn children(&self, element: MockElement) -> Vec<MockElement> {
        self.nodes.borrow()[element.0]
            .children
            .iter()
            .copied()
            .map(MockElement)
            .collect()
    }

    /// Tag name of an element.
    #[must_use]
    pub fn tag(&self, element: MockElement) -> String {
        self.nodes.borrow()[element.0].tag.clone()
    }

    /// Text content of an element.
    #[must_use]
    pub fn text(&self, element: MockElement) -> String {
        self.nodes.borrow()[element.0].text.clone()
    }

    /// Depth-first traversal in document order.
    fn walk(&self, id: usize, out: &mut Vec<usize>) {
        out.push(id);
        let children = self.nodes.borrow()[id].children.clone();
        for child in children {
            self.walk(child, out);
        }
    }
}

impl ContentTree for MockTree {
    type Element = MockElement;

    fn code_elements(&self) -> Vec<MockElement> {
        let mut order = Vec::new();
        self.walk(0, &mut order);
        let nodes = self.nodes.borrow();
        order
            .into_iter()
            .filter(|&id| nodes[id].tag == "code")
            .map(MockElement)
            .collect()
    }

    fn class_name(&self, element: &MockElement) -> Option<String> {
        self.nodes.borrow()[element.0].class_name.clone()
    }

    fn parent_element(&self, element: &MockElement) -> Option<MockElement> {
        self.nodes.borrow()[element.0].parent.map(MockElement)
    }

    fn next_element_sibling(&self, element: &MockElement) -> Option<MockElement> {
        let nodes = self.nodes.borrow();
        let parent = nodes[element.0].parent?;
        let siblings = &nodes[parent].children;
        let pos = siblings.iter().position(|&id| id == element.0)?;
        siblings.get(pos + 1).copied().map(MockElement)
    }

    fn previous_element_sibling(&self, element: &MockElement) -> Option<MockElement> {
        let nodes = self.nodes.borrow();
        let parent = nodes[element.0].parent?;
        let siblings = &nodes[parent].children;
        let pos = siblings.iter().position(|&id| id == element.0)?;
        siblings[..pos].last().copied().map(MockElement)
    }

    fn has_marker(&self, element: &MockElement, marker: &str) -> bool {
        self.nodes.borrow()[element.0].markers.contains(marker)
    }

    fn set_marker(&self, element: &MockElement, marker: &str, on: bool) {
        let mut nodes = self.nodes.borrow_mut();
        let markers = &mut nodes[element.0].markers;
        if on {
            markers.insert(marker.to_owned());
        } else {
            markers.remove(marker);
        }
    }
}

impl TabHost for MockTree {
    fn insert_tab_strip(&self, anchor: &MockElement) -> Option<MockElement> {
        let mut nodes = self.nodes.borrow_mut();
        let parent = nodes[anchor.0].parent?;
        let pos = nodes[parent].children.iter().position(|&id| id == anchor.0)?;

        let id = nodes.len();
        let mut strip = MockNode::new("div", None, Some(parent));
        strip.markers.insert(TAB_STRIP_MARKER.to_owned());
        nodes.push(strip);
        nodes[parent].children.insert(pos, id);
        Some(MockElement(id))
    }

    fn remove_element(&self, element: &MockElement) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[element.0].parent.take() {
            nodes[parent].children.retain(|&id| id != element.0);
        }
    }

    fn append_tab_item(&self, strip: &MockElement, label: &str) -> MockElement {
        let item = self.append(*strip, "span", None);
        let mut nodes = self.nodes.borrow_mut();
        nodes[item.0].text = label.to_owned();
        nodes[item.0].markers.insert(TAB_ITEM_MARKER.to_owned());
        item
    }

    fn is_visible(&self, element: &MockElement) -> bool {
        !self.nodes.borrow()[element.0].hidden
    }

    fn set_visible(&self, element: &MockElement, visible: bool) {
        self.nodes.borrow_mut()[element.0].hidden = !visible;
    }
}
