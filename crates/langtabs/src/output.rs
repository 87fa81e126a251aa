//! Styled terminal output.

use console::{StyledObject, Term, style};

/// Terminal output for commands.
///
/// Progress and diagnostics go to stderr so that [`data`](Self::data), the
/// only stdout channel, stays machine-readable.
pub(crate) struct Output {
    stderr: Term,
    stdout: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            stderr: Term::stderr(),
            stdout: Term::stdout(),
        }
    }

    pub(crate) fn info(&self, msg: &str) {
        self.line(style(msg));
    }

    /// Green.
    pub(crate) fn success(&self, msg: &str) {
        self.line(style(msg).green());
    }

    /// Yellow.
    pub(crate) fn warning(&self, msg: &str) {
        self.line(style(msg).yellow());
    }

    /// Red.
    pub(crate) fn error(&self, msg: &str) {
        self.line(style(msg).red());
    }

    /// Bold cyan, for headings and page names.
    pub(crate) fn highlight(&self, msg: &str) {
        self.line(style(msg).cyan().bold());
    }

    /// Dimmed, for per-page details.
    pub(crate) fn detail(&self, msg: &str) {
        self.line(style(msg).dim());
    }

    /// Write a result line to stdout, unstyled.
    pub(crate) fn data(&self, msg: &str) {
        let _ = self.stdout.write_line(msg);
    }

    fn line(&self, styled: StyledObject<&str>) {
        let _ = self.stderr.write_line(&styled.to_string());
    }
}
