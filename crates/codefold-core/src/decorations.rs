//! Fold decorations (virtual UI) data model.
//!
//! Decorations are anchored to document character offsets and never modify the document text.
//! The inline fold renderer produces one per located block:
//!
//! - an unfolded block gets a small toggle button at its start
//! - a folded block is replaced by a single summary block (header plus a few leading lines)
//!
//! Decorations are derived state. Activating one yields a [`ToggleRequest`] for the view to
//! queue; a decoration never changes fold state itself.

use crate::config::ButtonAlignment;
use crate::intervals::CodeBlockSpan;
use crate::protocol::ToggleRequest;

/// A source/layer identifier for decorations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecorationLayerId(pub u32);

impl DecorationLayerId {
    /// Decorations produced by the inline fold renderer.
    pub const CODE_BLOCK_FOLDS: Self = Self(1);

    /// Create a new layer id.
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// A half-open character-offset range (`start..end`) in the document.
///
/// For point-anchored decorations, use `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecorationRange {
    /// Range start offset (inclusive).
    pub start: usize,
    /// Range end offset (exclusive).
    pub end: usize,
}

impl DecorationRange {
    /// Create a new decoration range.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A zero-width range at `offset`.
    pub fn point(offset: usize) -> Self {
        Self::new(offset, offset)
    }
}

impl From<CodeBlockSpan> for DecorationRange {
    fn from(span: CodeBlockSpan) -> Self {
        Self::new(span.start, span.end)
    }
}

/// Where to render a decoration relative to its anchor range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationPlacement {
    /// Render before the anchor (a point widget).
    Before,
    /// Replace the anchor range with a block.
    Replace,
}

/// A coarse decoration kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DecorationKind {
    /// Toggle button on an unfolded block.
    FoldToggle,
    /// Summary block standing in for a folded block.
    CollapsedBlock,
}

/// The clickable fold affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldButton {
    /// Icon text (one or two grapheme clusters).
    pub icon: String,
    /// Side the button is drawn on.
    pub alignment: ButtonAlignment,
    /// Whether the button has no background.
    pub transparent: bool,
    /// Request issued when the button is activated.
    pub action: ToggleRequest,
}

/// Content shown inside a folded block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapsedPreview {
    /// Leading content lines (fence lines excluded), at most the configured count.
    pub lines: Vec<String>,
    /// Content lines not shown.
    pub hidden_line_count: usize,
    /// Whether long lines scroll horizontally instead of wrapping.
    pub horizontal_scroll: bool,
}

impl CollapsedPreview {
    /// Check if the preview is a bare header (no content lines).
    pub fn is_header_only(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A single fold decoration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    /// Anchor range in character offsets.
    pub range: DecorationRange,
    /// Relative placement.
    pub placement: DecorationPlacement,
    /// A coarse decoration kind.
    pub kind: DecorationKind,
    /// The block this decoration belongs to.
    pub span: CodeBlockSpan,
    /// The fold button.
    pub button: FoldButton,
    /// Summary content, present for [`DecorationKind::CollapsedBlock`] only.
    pub preview: Option<CollapsedPreview>,
}

impl Decoration {
    /// Toggle widget for an unfolded block.
    pub fn toggle(span: CodeBlockSpan, button: FoldButton) -> Self {
        Self {
            range: DecorationRange::point(span.start),
            placement: DecorationPlacement::Before,
            kind: DecorationKind::FoldToggle,
            span,
            button,
            preview: None,
        }
    }

    /// Block replacement for a folded block.
    pub fn collapsed(span: CodeBlockSpan, button: FoldButton, preview: CollapsedPreview) -> Self {
        Self {
            range: span.into(),
            placement: DecorationPlacement::Replace,
            kind: DecorationKind::CollapsedBlock,
            span,
            button,
            preview: Some(preview),
        }
    }

    /// Check if this decoration stands in for a folded block.
    pub fn is_collapsed(&self) -> bool {
        self.kind == DecorationKind::CollapsedBlock
    }

    /// The request issued when the user activates the button.
    pub fn activate(&self) -> ToggleRequest {
        self.button.action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(action: ToggleRequest) -> FoldButton {
        FoldButton {
            icon: "▼".to_string(),
            alignment: ButtonAlignment::Left,
            transparent: false,
            action,
        }
    }

    #[test]
    fn test_toggle_is_point_anchored() {
        let span = CodeBlockSpan::new(4, 20);
        let decoration = Decoration::toggle(span, button(ToggleRequest::toggle(span)));
        assert_eq!(decoration.range, DecorationRange::point(4));
        assert_eq!(decoration.placement, DecorationPlacement::Before);
        assert!(!decoration.is_collapsed());
        assert_eq!(decoration.activate(), ToggleRequest::toggle(span));
    }

    #[test]
    fn test_collapsed_replaces_span() {
        let span = CodeBlockSpan::new(4, 20);
        let preview = CollapsedPreview {
            lines: Vec::new(),
            hidden_line_count: 3,
            horizontal_scroll: true,
        };
        let decoration = Decoration::collapsed(span, button(ToggleRequest::expand(span)), preview);
        assert_eq!(decoration.range, DecorationRange::new(4, 20));
        assert_eq!(decoration.placement, DecorationPlacement::Replace);
        assert!(decoration.is_collapsed());
        assert!(decoration.preview.as_ref().is_some_and(CollapsedPreview::is_header_only));
        assert_eq!(decoration.activate().desired, Some(false));
    }
}
