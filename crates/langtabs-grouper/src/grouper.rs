//! The [`TabGrouper`] entry point.

use tracing::debug;

use crate::control::{TabControl, synthesize_tabs};
use crate::host::{ContentTree, TabHost};
use crate::languages::Languages;
use crate::scan::{Group, scan};

/// Groups adjacent code blocks of recognized languages into tab controls.
///
/// Holds no state besides the recognized languages: every call works on the
/// content handle it is given.
#[derive(Clone, Debug, Default)]
pub struct TabGrouper {
    languages: Languages,
}

impl TabGrouper {
    /// Create a grouper recognizing `languages`, in priority order.
    pub fn new<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_languages(Languages::new(languages))
    }

    /// Create a grouper from an existing language set.
    #[must_use]
    pub fn with_languages(languages: Languages) -> Self {
        Self { languages }
    }

    /// Recognized languages.
    #[must_use]
    pub fn languages(&self) -> &Languages {
        &self.languages
    }

    /// Find and partition recognized code blocks. See [`scan`](crate::scan()).
    pub fn scan<T: ContentTree>(&self, tree: &T) -> Vec<Group<T::Element>> {
        scan(tree, &self.languages)
    }

    /// Build the tab control for one group. See [`synthesize_tabs`].
    pub fn synthesize_tabs<H: TabHost>(
        &self,
        host: &H,
        group: &Group<H::Element>,
    ) -> Option<TabControl<H::Element>> {
        synthesize_tabs(host, group)
    }

    /// Scan, then build a tab control for every group of two or more blocks.
    ///
    /// The whole scan completes before the first control is built, so tab
    /// strips inserted into the content never affect grouping.
    pub fn group_and_tab<H: TabHost>(&self, host: &H) -> Vec<TabControl<H::Element>> {
        let groups = self.scan(host);
        let controls: Vec<_> = groups
            .iter()
            .filter_map(|group| self.synthesize_tabs(host, group))
            .collect();
        debug!(
            groups = groups.len(),
            controls = controls.len(),
            "grouped code blocks into tabs"
        );
        controls
    }
}

/// Group and tab the recognized `languages` in `host`.
///
/// Convenience for `TabGrouper::new(languages).group_and_tab(host)`.
pub fn group_and_tab<H, I, S>(host: &H, languages: I) -> Vec<TabControl<H::Element>>
where
    H: TabHost,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    TabGrouper::new(languages).group_and_tab(host)
}
