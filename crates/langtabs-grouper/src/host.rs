//! Host abstraction over rendered content.
//!
//! The grouping logic never touches a concrete DOM. It reads and mutates
//! content through [`ContentTree`] (discovery and markers) and [`TabHost`]
//! (tab strip construction and visibility). Implementations use interior
//! mutability, the same way a browser DOM is mutated through shared handles.

use crate::languages::tokenize;

/// Marker applied to every container holding a recognized code block.
pub const TABBED_MARKER: &str = "tabbed";
/// Marker of the synthesized tab strip.
pub const TAB_STRIP_MARKER: &str = "lang-tabs";
/// Marker of a single tab item within a strip.
pub const TAB_ITEM_MARKER: &str = "lang-tab";
/// Marker of the currently selected tab item.
pub const ACTIVE_MARKER: &str = "active";

/// Read access to rendered content plus structural markers.
pub trait ContentTree {
    /// Element handle. Equality is identity: two handles are equal when they
    /// refer to the same element.
    type Element: Clone + PartialEq;

    /// All code-bearing elements, in document order.
    fn code_elements(&self) -> Vec<Self::Element>;

    /// Raw classification attribute of an element, if any.
    fn class_name(&self, element: &Self::Element) -> Option<String>;

    /// Lowercased classification tokens of an element.
    ///
    /// Missing or malformed attributes yield no tokens.
    fn classification_tokens(&self, element: &Self::Element) -> Vec<String> {
        self.class_name(element)
            .map(|class_name| tokenize(&class_name))
            .unwrap_or_default()
    }

    /// Parent of an element, when the parent is itself an element.
    fn parent_element(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Next sibling that is an element (text and comments are skipped).
    fn next_element_sibling(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Previous sibling that is an element (text and comments are skipped).
    fn previous_element_sibling(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Whether the element carries `marker`.
    fn has_marker(&self, element: &Self::Element, marker: &str) -> bool;

    /// Add (`on = true`) or remove `marker` on an element. Idempotent.
    fn set_marker(&self, element: &Self::Element, marker: &str, on: bool);
}

/// Content that can host synthesized tab controls.
pub trait TabHost: ContentTree {
    /// Insert an empty tab strip immediately before `anchor`, under the same
    /// parent, and return it.
    ///
    /// Returns `None` when `anchor` is detached.
    fn insert_tab_strip(&self, anchor: &Self::Element) -> Option<Self::Element>;

    /// Detach an element, with its subtree, from the content.
    fn remove_element(&self, element: &Self::Element);

    /// Append a tab item labeled `label` to `strip` and return it.
    fn append_tab_item(&self, strip: &Self::Element, label: &str) -> Self::Element;

    /// Whether the element is currently shown.
    fn is_visible(&self, element: &Self::Element) -> bool;

    /// Show or hide an element. Idempotent.
    fn set_visible(&self, element: &Self::Element, visible: bool);
}
