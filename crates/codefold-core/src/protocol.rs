//! Fold toggle protocol.
//!
//! A [`ToggleRequest`] is the only way fold state changes. Requests are queued against the
//! current document version and applied by the fold store on the next reduction cycle; renderers
//! observe the resulting state, never the request itself.

use crate::delta::TextDelta;
use crate::intervals::CodeBlockSpan;

/// A request to change the fold state of one span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToggleRequest {
    /// Span start (character offset).
    pub from: usize,
    /// Span end (character offset, exclusive).
    pub to: usize,
    /// `None` flips the current state, `Some(true)` forces folded, `Some(false)` forces unfolded.
    pub desired: Option<bool>,
}

/// The intent carried by a [`ToggleRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldIntent {
    /// Flip whatever the store holds for the span.
    Toggle,
    /// Force folded (default-state application).
    Collapse,
    /// Force unfolded (auto-expand on edit, explicit expand).
    Expand,
}

impl ToggleRequest {
    /// Create a request for `from..to`.
    pub fn new(from: usize, to: usize, desired: Option<bool>) -> Self {
        Self { from, to, desired }
    }

    /// Flip the fold state of `span`.
    pub fn toggle(span: CodeBlockSpan) -> Self {
        Self::new(span.start, span.end, None)
    }

    /// Force `span` folded.
    pub fn collapse(span: CodeBlockSpan) -> Self {
        Self::new(span.start, span.end, Some(true))
    }

    /// Force `span` unfolded.
    pub fn expand(span: CodeBlockSpan) -> Self {
        Self::new(span.start, span.end, Some(false))
    }

    /// The span this request names.
    pub fn span(&self) -> CodeBlockSpan {
        CodeBlockSpan::new(self.from, self.to)
    }

    /// The intent of this request.
    pub fn intent(&self) -> FoldIntent {
        match self.desired {
            None => FoldIntent::Toggle,
            Some(true) => FoldIntent::Collapse,
            Some(false) => FoldIntent::Expand,
        }
    }

    /// Carry the request across a document change; `None` if its span no longer exists.
    pub fn map_through(&self, delta: &TextDelta) -> Option<Self> {
        let span = self.span().map_through(delta)?;
        Some(Self::new(span.start, span.end, self.desired))
    }
}

/// The unit committed by one reduction cycle: a document change plus fold requests.
///
/// Requests are expressed in the coordinates of the document *after* `delta` is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    /// Document change (may be empty).
    pub delta: TextDelta,
    /// Fold requests, applied in order after the store is remapped through `delta`.
    pub requests: Vec<ToggleRequest>,
}

impl Transaction {
    /// An empty transaction.
    pub fn new() -> Self {
        Self::default()
    }

    /// A transaction carrying a document change only.
    pub fn edit(delta: TextDelta) -> Self {
        Self {
            delta,
            requests: Vec::new(),
        }
    }

    /// A transaction carrying fold requests only.
    pub fn requests(requests: Vec<ToggleRequest>) -> Self {
        Self {
            delta: TextDelta::new(),
            requests,
        }
    }

    /// Append a request (builder style).
    pub fn with_request(mut self, request: ToggleRequest) -> Self {
        self.requests.push(request);
        self
    }

    /// Returns `true` if the transaction changes neither text nor folds.
    pub fn is_empty(&self) -> bool {
        self.delta.is_empty() && self.requests.is_empty()
    }
}
