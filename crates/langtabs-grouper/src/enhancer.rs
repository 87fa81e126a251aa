//! Page ready pipeline.
//!
//! An [`Enhancer`] stands for the page "ready" signal: it parses a rendered
//! page, fires the registered ready handlers against it in a fixed order,
//! and serializes the result. Tab grouping always runs first so later
//! handlers see the final structure.
//!
//! Processing is idempotent: feeding a processed page back in yields the
//! same HTML, so a site can be post-processed in place any number of times.

use std::fmt;

use tracing::debug;

use crate::grouper::TabGrouper;
use crate::html::{HtmlError, HtmlPage};
use crate::languages::Languages;

type ReadyHook = Box<dyn Fn(&HtmlPage)>;

/// Result of enhancing one page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enhanced {
    /// Serialized page.
    pub html: String,
    /// Number of groups found, singletons included.
    pub groups: usize,
    /// Number of tab controls synthesized.
    pub tab_controls: usize,
}

/// Applies tab grouping and additional ready handlers to rendered pages.
///
/// # Example
///
/// ```
/// use langtabs_grouper::Enhancer;
///
/// let enhancer = Enhancer::new().with_lang_tabs(["Hjson", "JSON", "TOML"]);
/// let page = enhancer
///     .process(r#"<pre><code class="language-json">{}</code></pre>"#)
///     .unwrap();
/// assert_eq!(page.groups, 1);
/// assert_eq!(page.tab_controls, 0);
/// ```
#[derive(Default)]
pub struct Enhancer {
    grouper: Option<TabGrouper>,
    hooks: Vec<ReadyHook>,
}

impl Enhancer {
    /// Create an enhancer with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Group code blocks of `languages` into tabs when a page is ready.
    #[must_use]
    pub fn with_lang_tabs<I, S>(self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_languages(Languages::new(languages))
    }

    /// Same as [`with_lang_tabs`](Self::with_lang_tabs) with a prepared set.
    #[must_use]
    pub fn with_languages(mut self, languages: Languages) -> Self {
        self.grouper = Some(TabGrouper::with_languages(languages));
        self
    }

    /// Register a handler fired once per page, after tab grouping.
    ///
    /// Handlers fire in registration order.
    #[must_use]
    pub fn on_ready(mut self, hook: impl Fn(&HtmlPage) + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Parse `html`, fire the ready handlers, and serialize the result.
    pub fn process(&self, html: &str) -> Result<Enhanced, HtmlError> {
        let page = HtmlPage::parse(html);
        let (groups, tab_controls) = self.ready(&page);
        Ok(Enhanced {
            html: page.to_html()?,
            groups,
            tab_controls,
        })
    }

    /// Fire the ready signal on an already parsed page.
    ///
    /// Returns the number of groups and of tab controls.
    pub fn ready(&self, page: &HtmlPage) -> (usize, usize) {
        let (groups, tab_controls) = match &self.grouper {
            Some(grouper) => {
                let groups = grouper.scan(page);
                let controls = groups
                    .iter()
                    .filter_map(|group| grouper.synthesize_tabs(page, group))
                    .count();
                if controls > 0 && page.install_tab_script() {
                    debug!("installed tab switching script");
                }
                (groups.len(), controls)
            }
            None => (0, 0),
        };
        for hook in &self.hooks {
            hook(page);
        }
        debug!(groups, tab_controls, hooks = self.hooks.len(), "page ready");
        (groups, tab_controls)
    }
}

impl fmt::Debug for Enhancer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Enhancer")
            .field("grouper", &self.grouper)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::host::{ContentTree, TABBED_MARKER, TAB_STRIP_MARKER};
    use crate::html::TAB_SCRIPT_ID;

    #[test]
    fn test_process_without_handlers_round_trips() {
        let html = r#"<pre><code class="language-json">{}</code></pre><pre><code class="language-toml"></code></pre>"#;
        let enhanced = Enhancer::new().process(html).unwrap();

        assert_eq!(enhanced.html, html);
        assert_eq!(enhanced.groups, 0);
        assert_eq!(enhanced.tab_controls, 0);
    }

    #[test]
    fn test_process_counts_groups_and_controls() {
        let html = concat!(
            r#"<pre><code class="language-json">{}</code></pre>"#,
            r#"<pre><code class="language-toml"></code></pre>"#,
            "<p>single</p>",
            r#"<pre><code class="language-hjson"></code></pre>"#,
        );
        let enhanced = Enhancer::new()
            .with_lang_tabs(["Hjson", "JSON", "TOML"])
            .process(html)
            .unwrap();

        assert_eq!(enhanced.groups, 2);
        assert_eq!(enhanced.tab_controls, 1);
        assert!(enhanced.html.starts_with(r#"<div class="lang-tabs">"#));
    }

    #[test]
    fn test_hooks_fire_in_order_after_grouping() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let first = Rc::clone(&seen);
        let second = Rc::clone(&seen);

        let enhancer = Enhancer::new()
            .with_lang_tabs(["JSON", "TOML"])
            .on_ready(move |page| {
                let tabbed = page
                    .code_elements()
                    .iter()
                    .filter_map(|code| page.parent_element(code))
                    .filter(|pre| page.has_marker(pre, TABBED_MARKER))
                    .count();
                let has_strip = page.to_html().unwrap().contains(TAB_STRIP_MARKER);
                first.borrow_mut().push(format!("first:{has_strip}:{tabbed}"));
            })
            .on_ready(move |_| second.borrow_mut().push("second".to_owned()));

        enhancer
            .process(r#"<pre><code class="json"></code></pre><pre><code class="toml"></code></pre>"#)
            .unwrap();

        assert_eq!(*seen.borrow(), ["first:true:2", "second"]);
    }

    #[test]
    fn test_enhancer_is_reusable_across_pages() {
        let enhancer = Enhancer::new().with_lang_tabs(["JSON", "TOML"]);
        let html = r#"<pre><code class="json"></code></pre><pre><code class="toml"></code></pre>"#;

        let a = enhancer.process(html).unwrap();
        let b = enhancer.process(html).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.tab_controls, 1);
    }

    const PAIR: &str = concat!(
        r#"<pre><code class="language-json">{"a": 1}</code></pre>"#,
        "\n",
        r#"<pre><code class="language-toml">a = 1</code></pre>"#,
    );

    #[test]
    fn test_processing_output_again_is_stable() {
        let enhancer = Enhancer::new().with_lang_tabs(["JSON", "TOML"]);

        let once = enhancer.process(PAIR).unwrap();
        let twice = enhancer.process(&once.html).unwrap();

        assert_eq!(twice.html, once.html);
        assert_eq!(twice.tab_controls, 1);
        assert_eq!(once.html.matches(r#"class="lang-tabs""#).count(), 1);
        assert_eq!(once.html.matches("<script").count(), 1);
    }

    #[test]
    fn test_processing_document_again_is_stable() {
        let html = format!(
            "<!DOCTYPE html><html><head><title>T</title></head><body>{PAIR}</body></html>"
        );
        let enhancer = Enhancer::new().with_lang_tabs(["JSON", "TOML"]);

        let once = enhancer.process(&html).unwrap();
        let twice = enhancer.process(&once.html).unwrap();

        assert_eq!(twice.html, once.html);
        assert!(once.html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_tabbed_page_carries_switching_script() {
        let enhanced = Enhancer::new()
            .with_lang_tabs(["JSON", "TOML"])
            .process(PAIR)
            .unwrap();

        let script = format!(r#"<script id="{TAB_SCRIPT_ID}">"#);
        assert!(enhanced.html.contains(&script));
        assert!(enhanced.html.contains(r#"addEventListener("click""#));
        assert!(enhanced.html.contains(".lang-tabs > .lang-tab"));
        assert!(enhanced.html.ends_with("</script>"));
    }

    #[test]
    fn test_page_without_tabs_gets_no_script() {
        let html = r#"<pre><code class="language-json">{}</code></pre><p>or</p><pre><code class="language-toml"></code></pre>"#;
        let enhanced = Enhancer::new()
            .with_lang_tabs(["JSON", "TOML"])
            .process(html)
            .unwrap();

        assert_eq!(enhanced.tab_controls, 0);
        assert!(!enhanced.html.contains("<script"));
    }
}
