//! Recognized language labels and classification token matching.

/// Ordered set of recognized language labels.
///
/// Labels are compared case-insensitively against classification tokens.
/// The order in which labels are supplied defines tagging priority: a code
/// element whose tokens contain several recognized labels is tagged with the
/// first one in this list, not the first one in its class attribute.
///
/// # Example
///
/// ```
/// use langtabs_grouper::Languages;
///
/// let languages = Languages::new(["Hjson", "JSON", "TOML"]);
/// let tokens = ["language".to_owned(), "json".to_owned()];
/// assert_eq!(languages.match_tokens(&tokens), Some("JSON"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Languages {
    /// Labels as supplied by the caller, used for tab item text.
    labels: Vec<String>,
    /// Lowercased labels, same order as `labels`.
    folded: Vec<String>,
}

impl Languages {
    /// Create a language set from caller-supplied labels.
    ///
    /// Blank labels are dropped since they can never match a token.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels
            .into_iter()
            .map(Into::into)
            .filter(|label| !label.trim().is_empty())
            .collect();
        let folded = labels.iter().map(|label| label.to_lowercase()).collect();
        Self { labels, folded }
    }

    /// Whether no label is recognized (matches nothing).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in priority order, as supplied.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Find the highest-priority label present among `tokens`.
    ///
    /// Tokens are expected to be lowercased already (see [`tokenize`]).
    #[must_use]
    pub fn match_tokens(&self, tokens: &[String]) -> Option<&str> {
        self.folded
            .iter()
            .position(|label| tokens.iter().any(|token| token == label))
            .map(|idx| self.labels[idx].as_str())
    }
}

/// Split a class attribute into lowercased classification tokens.
///
/// Tokens are separated by whitespace and hyphens, so `language-json`
/// yields `["language", "json"]`. Empty tokens are dropped.
///
/// # Example
///
/// ```
/// use langtabs_grouper::tokenize;
///
/// assert_eq!(tokenize("hljs language-TOML"), ["hljs", "language", "toml"]);
/// ```
#[must_use]
pub fn tokenize(class_name: &str) -> Vec<String> {
    class_name
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}
