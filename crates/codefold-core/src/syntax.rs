//! Fence classification (the syntax oracle queried by the region locator).
//!
//! The locator only trusts a backtick line as an *opening* fence if a [`FenceClassifier`] says
//! so. This separates real fences from backtick text that appears inside other constructs.
//! Hosts with a real markdown parser can implement the trait themselves; the built-in
//! [`MarkdownFenceClassifier`] is a lightweight line scanner.

use crate::document::Document;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// `^ {0,3}` then a run of 3+ backticks, then an info string without backticks.
static OPENING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}`{3,}[^`]*$").expect("valid fence pattern"));

/// Returns `true` if the trimmed line begins with a triple-backtick fence.
pub fn is_fence_line(line: &str) -> bool {
    line.trim().starts_with("```")
}

/// Returns `true` if `line` is a front-matter delimiter (`---`, or `...` when closing).
pub(crate) fn is_frontmatter_delimiter(line: &str, closing: bool) -> bool {
    let line = line.trim_end();
    line == "---" || (closing && line == "...")
}

/// Index of the line closing a leading front-matter block, if the text starts with one.
pub(crate) fn frontmatter_close_line<I, S>(lines: I) -> Option<usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut lines = lines.into_iter();
    if !is_frontmatter_delimiter(lines.next()?.as_ref(), false) {
        return None;
    }
    lines
        .position(|line| is_frontmatter_delimiter(line.as_ref(), true))
        .map(|idx| idx + 1)
}

/// Logical line numbers that open a fenced code region.
pub type FenceOpenings = BTreeSet<usize>;

/// Classifies which lines of a document open a fenced code region.
///
/// Implementations must be pure with respect to the document: the locator queries the oracle and
/// never mutates it.
pub trait FenceClassifier {
    /// Compute the opening-fence lines of `document`.
    fn fence_openings(&self, document: &Document) -> FenceOpenings;
}

/// A line-based markdown fence classifier.
///
/// A line opens a fence when it is outside the leading front-matter block, outside an already
/// open fence, indented by at most three spaces, and its info string contains no backtick.
/// An open fence is closed by the next line whose trimmed text starts with three backticks.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownFenceClassifier;

impl MarkdownFenceClassifier {
    /// Create the classifier.
    pub fn new() -> Self {
        Self
    }

    /// Whether a single line, seen outside any open fence, opens one.
    pub fn is_opening_line(line: &str) -> bool {
        OPENING_FENCE.is_match(line)
    }
}

impl FenceClassifier for MarkdownFenceClassifier {
    fn fence_openings(&self, document: &Document) -> FenceOpenings {
        let line_count = document.line_count();
        let lines = (0..line_count).filter_map(|line| document.line_text(line));

        let mut openings = FenceOpenings::new();
        let first_body_line = frontmatter_close_line(lines.clone()).map_or(0, |close| close + 1);
        let mut in_fence = false;

        for (line_no, text) in lines.enumerate().skip(first_body_line) {
            if in_fence {
                if is_fence_line(&text) {
                    in_fence = false;
                }
                continue;
            }
            if Self::is_opening_line(&text) {
                openings.insert(line_no);
                in_fence = true;
            }
        }

        openings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn openings(text: &str) -> Vec<usize> {
        MarkdownFenceClassifier
            .fence_openings(&Document::from_text(text))
            .into_iter()
            .collect()
    }

    #[test]
    fn test_fence_line_detection() {
        assert!(is_fence_line("```"));
        assert!(is_fence_line("   ```rust"));
        assert!(is_fence_line("\t```"));
        assert!(!is_fence_line("``"));
        assert!(!is_fence_line("> ```"));
    }

    #[test]
    fn test_opening_line_rules() {
        assert!(MarkdownFenceClassifier::is_opening_line("```"));
        assert!(MarkdownFenceClassifier::is_opening_line("```rust title=\"a\""));
        assert!(MarkdownFenceClassifier::is_opening_line("   ````"));
        assert!(!MarkdownFenceClassifier::is_opening_line("    ```"));
        assert!(!MarkdownFenceClassifier::is_opening_line("```inline```"));
        assert!(!MarkdownFenceClassifier::is_opening_line("~~~"));
    }

    #[test]
    fn test_openings_skip_fence_bodies() {
        // Any backtick fence line closes an open block, info string or not, so `js` and `py`
        // close the blocks opened on lines 0 and 2.
        let text = "```\n```js\n```\ntext\n```py\nx\n```";
        assert_eq!(openings(text), vec![0, 2, 6]);
    }

    #[test]
    fn test_unicode_separators_stay_inside_the_line() {
        // One line whose info string holds backticks, then a real opening fence.
        let text = "```\u{2028}```\n```";
        assert_eq!(openings(text), vec![1]);
    }

    #[test]
    fn test_frontmatter_is_not_scanned() {
        let text = "---\nnote: |\n  ```\n---\n```\ncode\n```";
        assert_eq!(openings(text), vec![4]);
    }

    #[test]
    fn test_unclosed_frontmatter_is_body() {
        let text = "---\n```\ncode";
        assert_eq!(openings(text), vec![1]);
    }

    #[test]
    fn test_frontmatter_close_line() {
        assert_eq!(frontmatter_close_line(["---", "a: 1", "..."]), Some(2));
        assert_eq!(frontmatter_close_line(["---", "a: 1"]), None);
        assert_eq!(frontmatter_close_line(["a: 1", "---"]), None);
    }
}
