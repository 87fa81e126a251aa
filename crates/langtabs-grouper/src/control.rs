//! Tab controls synthesized for multi-block groups.

use tracing::{debug, warn};

use crate::host::{ACTIVE_MARKER, TAB_STRIP_MARKER, TabHost};
use crate::scan::Group;

/// Selection state of one tab strip.
///
/// Holds the tab items, the containers they switch between (same order),
/// and the index of the selected one. Exactly one container is visible and
/// exactly its item carries the [`ACTIVE_MARKER`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabControl<E> {
    strip: E,
    labels: Vec<String>,
    items: Vec<E>,
    panels: Vec<E>,
    active: usize,
}

impl<E: Clone + PartialEq> TabControl<E> {
    /// The tab strip element.
    #[must_use]
    pub fn strip(&self) -> &E {
        &self.strip
    }

    /// Tab item elements, in group order.
    #[must_use]
    pub fn items(&self) -> &[E] {
        &self.items
    }

    /// Containers switched by the items, in group order.
    #[must_use]
    pub fn panels(&self) -> &[E] {
        &self.panels
    }

    /// Tab labels, in group order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Index of the selected tab.
    #[must_use]
    pub fn active(&self) -> usize {
        self.active
    }

    /// Number of tabs (at least two).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false`; a control is only built for groups of two or more.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Select tab `index`: mark only its item active, show only its container.
    ///
    /// Selecting the current tab is a no-op. Returns `false` and leaves the
    /// control unchanged when `index` is out of range.
    pub fn select<H>(&mut self, host: &H, index: usize) -> bool
    where
        H: TabHost<Element = E>,
    {
        if index >= self.items.len() {
            warn!(index, tabs = self.items.len(), "tab index out of range");
            return false;
        }
        if index != self.active {
            self.active = index;
            self.apply(host);
        }
        true
    }

    /// Push the selection state to the host.
    fn apply<H>(&self, host: &H)
    where
        H: TabHost<Element = E>,
    {
        for (idx, (item, panel)) in self.items.iter().zip(&self.panels).enumerate() {
            let selected = idx == self.active;
            host.set_marker(item, ACTIVE_MARKER, selected);
            host.set_visible(panel, selected);
        }
    }
}

/// Build the tab strip for `group`.
///
/// The strip is inserted right before the first block's container, with one
/// item per block labeled with its language. The first tab starts selected.
/// A strip already sitting there, left by an earlier pass over the same
/// content, is replaced rather than stacked.
///
/// Groups of a single block get no control and the host is left untouched.
pub fn synthesize_tabs<H: TabHost>(
    host: &H,
    group: &Group<H::Element>,
) -> Option<TabControl<H::Element>> {
    if !group.is_tabbable() {
        return None;
    }

    let first = &group.first().container;
    if let Some(previous) = host.previous_element_sibling(first)
        && host.has_marker(&previous, TAB_STRIP_MARKER)
    {
        debug!(tabs = group.len(), "replacing existing tab strip");
        host.remove_element(&previous);
    }

    let strip = host.insert_tab_strip(first)?;
    let labels: Vec<String> = group.languages().map(str::to_owned).collect();
    let items = labels
        .iter()
        .map(|label| host.append_tab_item(&strip, label))
        .collect();
    let panels = group
        .blocks()
        .iter()
        .map(|block| block.container.clone())
        .collect();

    let control = TabControl {
        strip,
        labels,
        items,
        panels,
        active: 0,
    };
    control.apply(host);
    Some(control)
}
