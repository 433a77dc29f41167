//! Default-state resolver
//!
//! A newly discovered block starts folded or unfolded according to, in order:
//!
//! 1. the document's front-matter `code-blocks` key (`collapsed` / `expanded`)
//! 2. the global `default_collapsed` setting

use crate::config::ViewConfiguration;
use crate::intervals::CodeBlockSpan;
use crate::syntax::frontmatter_close_line;
use tracing::{debug, trace};

/// Front-matter key holding the per-document override.
pub const FRONTMATTER_KEY: &str = "code-blocks";

/// A per-document override of the default fold state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseOverride {
    /// Blocks start folded.
    Collapsed,
    /// Blocks start unfolded.
    Expanded,
}

impl CollapseOverride {
    /// Parse an override value (case-insensitive, surrounding whitespace ignored).
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("collapsed") {
            Some(Self::Collapsed)
        } else if value.eq_ignore_ascii_case("expanded") {
            Some(Self::Expanded)
        } else {
            None
        }
    }

    /// Whether blocks start folded.
    pub fn is_collapsed(self) -> bool {
        matches!(self, Self::Collapsed)
    }
}

/// Extract the raw YAML of a leading front-matter block (without the delimiter lines).
pub fn extract_frontmatter(text: &str) -> Option<&str> {
    let close = frontmatter_close_line(text.lines())?;

    // Byte offsets of the body: after the opening line, up to the closing line.
    let mut line_starts = text
        .match_indices('\n')
        .map(|(idx, _)| idx + 1)
        .take(close);
    let body_start = line_starts.next()?;
    let body_end = line_starts.last().unwrap_or(body_start);
    Some(&text[body_start..body_end])
}

/// Read the `code-blocks` override from the document's front-matter.
///
/// Missing front-matter, a missing key, an unrecognized value and malformed YAML all yield
/// `None`.
pub fn frontmatter_override(text: &str) -> Option<CollapseOverride> {
    let yaml = extract_frontmatter(text)?;
    let value: serde_yaml::Value = match serde_yaml::from_str(yaml) {
        Ok(value) => value,
        Err(err) => {
            debug!(error = %err, "ignoring malformed front-matter");
            return None;
        }
    };

    let raw = value.get(FRONTMATTER_KEY)?.as_str()?;
    let parsed = CollapseOverride::parse(raw);
    if parsed.is_none() {
        debug!(key = FRONTMATTER_KEY, value = raw, "unrecognized front-matter override");
    }
    parsed
}

/// Resolves the starting fold state of newly discovered blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultStateResolver {
    document_override: Option<CollapseOverride>,
    default_collapsed: bool,
}

impl DefaultStateResolver {
    /// Build a resolver from the document text and the view configuration.
    pub fn new(text: &str, config: &ViewConfiguration) -> Self {
        Self {
            document_override: frontmatter_override(text),
            default_collapsed: config.default_collapsed,
        }
    }

    /// Re-read the front-matter after the document changed.
    pub fn refresh(&mut self, text: &str) {
        self.document_override = frontmatter_override(text);
    }

    /// Pick up a new global default.
    pub fn reconfigure(&mut self, config: &ViewConfiguration) {
        self.default_collapsed = config.default_collapsed;
    }

    /// The per-document override currently in effect.
    pub fn document_override(&self) -> Option<CollapseOverride> {
        self.document_override
    }

    /// Whether blocks of this document start folded.
    pub fn starts_collapsed(&self) -> bool {
        match self.document_override {
            Some(over) => over.is_collapsed(),
            None => self.default_collapsed,
        }
    }

    /// Whether a newly discovered block at `span` starts folded.
    ///
    /// Every block of a document resolves the same way; the span is only logged.
    pub fn resolve(&self, span: CodeBlockSpan) -> bool {
        let collapsed = self.starts_collapsed();
        trace!(start = span.start, collapsed, "resolved default fold state");
        collapsed
    }
}
