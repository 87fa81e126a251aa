//! Tabbed groups of alternative-language code blocks.
//!
//! Documentation often shows the same example in several equivalent formats
//! (Hjson, JSON, TOML) as consecutive code blocks. This crate finds such runs
//! in rendered content and replaces the wall of blocks with a tab strip that
//! shows one block at a time.
//!
//! # Architecture
//!
//! - [`ContentTree`] / [`TabHost`]: the host abstraction. The grouping logic
//!   only sees element handles, classification tokens and sibling links.
//! - [`scan`]: finds recognized code blocks and partitions them into maximal
//!   runs of container-adjacent blocks ([`Group`]).
//! - [`synthesize_tabs`]: builds a [`TabControl`] for a group of two or more.
//! - [`TabGrouper`] / [`group_and_tab`]: scan then synthesize, in one call.
//! - [`HtmlPage`]: an html5ever host for rendered HTML pages.
//! - [`Enhancer`]: the page ready pipeline used to post-process a site. Pages
//!   that gain tabs also get the script that switches them in the browser.
//!
//! # Example
//!
//! ```
//! use langtabs_grouper::{HtmlPage, TabGrouper, TabHost};
//!
//! let page = HtmlPage::parse(concat!(
//!     r#"<pre><code class="language-hjson">port: 80</code></pre>"#,
//!     r#"<pre><code class="language-json">{"port": 80}</code></pre>"#,
//!     r#"<pre><code class="language-toml">port = 80</code></pre>"#,
//! ));
//!
//! let grouper = TabGrouper::new(["Hjson", "JSON", "TOML"]);
//! let mut controls = grouper.group_and_tab(&page);
//! assert_eq!(controls.len(), 1);
//!
//! let control = &mut controls[0];
//! control.select(&page, 2);
//! assert!(page.is_visible(&control.panels()[2]));
//! assert!(!page.is_visible(&control.panels()[0]));
//! ```

mod control;
mod enhancer;
mod grouper;
mod host;
mod html;
mod languages;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod scan;

pub use control::{TabControl, synthesize_tabs};
pub use enhancer::{Enhanced, Enhancer};
pub use grouper::{TabGrouper, group_and_tab};
pub use host::{
    ACTIVE_MARKER, ContentTree, TAB_ITEM_MARKER, TAB_STRIP_MARKER, TABBED_MARKER, TabHost,
};
pub use html::{HtmlElement, HtmlError, HtmlPage, TAB_SCRIPT_ID};
pub use languages::{Languages, tokenize};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockElement, MockTree};
pub use scan::{Block, Group, scan};
