//! Discovery of recognized code blocks and their partition into groups.

use tracing::debug;

use crate::host::{ContentTree, TABBED_MARKER};
use crate::languages::Languages;

/// A recognized code example.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block<E> {
    /// Recognized label, as supplied by the caller.
    pub language: String,
    /// Element wrapping the code element (e.g. `<pre>`).
    pub container: E,
}

/// Maximal run of container-adjacent recognized blocks.
///
/// A group is never empty: it is created from its first block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group<E> {
    blocks: Vec<Block<E>>,
}

impl<E> Group<E> {
    fn new(first: Block<E>) -> Self {
        Self {
            blocks: vec![first],
        }
    }

    /// Blocks in document order.
    #[must_use]
    pub fn blocks(&self) -> &[Block<E>] {
        &self.blocks
    }

    /// First block of the group.
    #[must_use]
    pub fn first(&self) -> &Block<E> {
        &self.blocks[0]
    }

    /// Last block of the group.
    #[must_use]
    pub fn last(&self) -> &Block<E> {
        &self.blocks[self.blocks.len() - 1]
    }

    /// Number of blocks (at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always `false`; present for API symmetry with collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Whether the group has more than one block and gets a tab control.
    #[must_use]
    pub fn is_tabbable(&self) -> bool {
        self.blocks.len() > 1
    }

    /// Languages of the blocks, in order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|block| block.language.as_str())
    }
}

/// Scan `tree` for code elements whose language is in `languages` and
/// partition them into groups.
///
/// Every matching container is marked [`TABBED_MARKER`], whatever the size of
/// its group. A block joins the previous group only when the previous block's
/// container is immediately followed (element-wise) by this block's container.
/// Any other element in between, recognized or not, breaks the run.
///
/// An empty language set matches nothing and leaves the tree untouched.
pub fn scan<T: ContentTree>(tree: &T, languages: &Languages) -> Vec<Group<T::Element>> {
    let mut groups: Vec<Group<T::Element>> = Vec::new();
    if languages.is_empty() {
        return groups;
    }

    for code in tree.code_elements() {
        let tokens = tree.classification_tokens(&code);
        let Some(language) = languages.match_tokens(&tokens) else {
            continue;
        };
        let Some(container) = tree.parent_element(&code) else {
            debug!(language, "recognized code element has no parent element, skipping");
            continue;
        };
        tree.set_marker(&container, TABBED_MARKER, true);

        let block = Block {
            language: language.to_owned(),
            container,
        };

        if let Some(group) = groups.last_mut()
            && tree
                .next_element_sibling(&group.last().container)
                .is_some_and(|next| next == block.container)
        {
            group.blocks.push(block);
            continue;
        }
        groups.push(Group::new(block));
    }

    debug!(
        groups = groups.len(),
        tabbable = groups.iter().filter(|g| g.is_tabbable()).count(),
        "scanned code blocks"
    );
    groups
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::mock::{MockElement, MockTree};

    fn config_languages() -> Languages {
        Languages::new(["Hjson", "JSON", "TOML"])
    }

    fn shape(groups: &[Group<MockElement>]) -> Vec<Vec<&str>> {
        groups.iter().map(|g| g.languages().collect()).collect()
    }

    #[test]
    fn test_three_adjacent_blocks_form_one_group() {
        let tree = MockTree::new();
        let a = tree.code_block("language-hjson");
        let b = tree.code_block("language-json");
        let c = tree.code_block("language-toml");

        let groups = scan(&tree, &config_languages());

        assert_eq!(shape(&groups), vec![vec!["Hjson", "JSON", "TOML"]]);
        let containers: Vec<_> = groups[0].blocks().iter().map(|b| b.container).collect();
        assert_eq!(containers, [a, b, c]);
    }

    #[test]
    fn test_paragraph_breaks_adjacency() {
        let tree = MockTree::new();
        tree.code_block("json");
        tree.paragraph();
        tree.code_block("toml");

        let groups = scan(&tree, &config_languages());

        assert_eq!(shape(&groups), vec![vec!["JSON"], vec!["TOML"]]);
        assert!(groups.iter().all(|g| !g.is_tabbable()));
    }

    #[test]
    fn test_unrecognized_language_excluded() {
        let tree = MockTree::new();
        let python = tree.code_block("language-python");

        let groups = scan(&tree, &config_languages());

        assert!(groups.is_empty());
        assert!(!tree.has_marker(&python, TABBED_MARKER));
    }

    #[test]
    fn test_unrecognized_block_breaks_adjacency() {
        let tree = MockTree::new();
        tree.code_block("json");
        tree.code_block("python");
        tree.code_block("toml");

        let groups = scan(&tree, &config_languages());

        assert_eq!(shape(&groups), vec![vec!["JSON"], vec!["TOML"]]);
    }

    #[test]
    fn test_empty_languages_yield_no_groups() {
        let tree = MockTree::new();
        let pre = tree.code_block("json");
        tree.code_block("toml");

        let groups = scan(&tree, &Languages::new(Vec::<String>::new()));

        assert!(groups.is_empty());
        assert!(!tree.has_marker(&pre, TABBED_MARKER));
    }

    #[test]
    fn test_all_matching_containers_marked_tabbed() {
        let tree = MockTree::new();
        let single = tree.code_block("json");
        tree.paragraph();
        let a = tree.code_block("hjson");
        let b = tree.code_block("toml");

        scan(&tree, &config_languages());

        for pre in [single, a, b] {
            assert!(tree.has_marker(&pre, TABBED_MARKER));
        }
    }

    #[test]
    fn test_label_priority_follows_caller_order() {
        let tree = MockTree::new();
        tree.code_block("toml json");

        let groups = scan(&tree, &Languages::new(["JSON", "TOML"]));
        assert_eq!(shape(&groups), vec![vec!["JSON"]]);

        let groups = scan(&tree, &Languages::new(["TOML", "JSON"]));
        assert_eq!(shape(&groups), vec![vec!["TOML"]]);
    }

    #[test]
    fn test_adjacency_is_tested_at_container_level() {
        let tree = MockTree::new();
        // Two recognized code elements in the same container are not adjacent
        // containers: each starts its own group.
        let pre = tree.append(tree.root(), "pre", None);
        tree.append(pre, "code", Some("json"));
        tree.append(pre, "code", Some("toml"));

        let groups = scan(&tree, &config_languages());

        assert_eq!(shape(&groups), vec![vec!["JSON"], vec!["TOML"]]);
    }

    #[test]
    fn test_blocks_in_different_parents_not_grouped() {
        let tree = MockTree::new();
        let left = tree.append(tree.root(), "div", None);
        let right = tree.append(tree.root(), "div", None);
        tree.code_block_in(left, "json");
        tree.code_block_in(right, "toml");

        let groups = scan(&tree, &config_languages());

        assert_eq!(shape(&groups), vec![vec!["JSON"], vec!["TOML"]]);
    }

    #[test]
    fn test_code_without_class_ignored() {
        let tree = MockTree::new();
        let pre = tree.append(tree.root(), "pre", None);
        tree.append(pre, "code", None);

        assert!(scan(&tree, &config_languages()).is_empty());
    }

    #[test]
    fn test_partition_is_complete_and_maximal() {
        // json json | p | toml | python | hjson json toml
        let tree = MockTree::new();
        tree.code_block("json");
        tree.code_block("json");
        tree.paragraph();
        tree.code_block("toml");
        tree.code_block("python");
        tree.code_block("hjson");
        tree.code_block("json");
        tree.code_block("toml");

        let groups = scan(&tree, &config_languages());

        assert_eq!(
            shape(&groups),
            vec![
                vec!["JSON", "JSON"],
                vec!["TOML"],
                vec!["Hjson", "JSON", "TOML"],
            ]
        );

        let recognized = tree
            .code_elements()
            .into_iter()
            .filter(|code| {
                config_languages()
                    .match_tokens(&tree.classification_tokens(code))
                    .is_some()
            })
            .count();
        assert_eq!(groups.iter().map(Group::len).sum::<usize>(), recognized);

        for pair in groups.windows(2) {
            assert_ne!(
                tree.next_element_sibling(&pair[0].last().container),
                Some(pair[1].first().container)
            );
        }
    }
}
