//! Region locator
//!
//! Derives the fenced code regions of a document snapshot. The result is recomputed from scratch
//! for every document version; spans are ordered and pairwise disjoint.

use crate::document::Document;
use crate::intervals::CodeBlockSpan;
use crate::syntax::{FenceClassifier, is_fence_line};

/// One located fenced region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeBlock {
    /// Character range of the region, fence lines included.
    pub span: CodeBlockSpan,
    /// Line of the opening fence.
    pub open_line: usize,
    /// Line of the closing fence, or `None` when the region runs to the document end.
    pub close_line: Option<usize>,
}

impl CodeBlock {
    /// Check if the caret at `offset` is inside the region (both span boundaries included).
    pub fn contains_offset(&self, offset: usize) -> bool {
        self.span.start <= offset && offset <= self.span.end
    }

    /// Check if the region has a closing fence.
    pub fn is_terminated(&self) -> bool {
        self.close_line.is_some()
    }

    /// Lines between the fences (`first..last`, exclusive end), given the document line count.
    pub fn content_lines(&self, line_count: usize) -> std::ops::Range<usize> {
        let first = self.open_line + 1;
        let last = self.close_line.unwrap_or(line_count).max(first);
        first..last
    }
}

/// Locate every fenced region in `document`.
///
/// A region opens at a line whose trimmed text begins with a triple-backtick fence and which the
/// classifier reports as an opening fence. It closes at the next fence line after it, or runs to
/// the end of the document.
pub fn locate_blocks(document: &Document, classifier: &dyn FenceClassifier) -> Vec<CodeBlock> {
    let openings = classifier.fence_openings(document);
    if openings.is_empty() {
        return Vec::new();
    }

    let line_count = document.line_count();
    let is_fence = |line: usize| document.line_text(line).is_some_and(|t| is_fence_line(&t));

    let mut blocks = Vec::with_capacity(openings.len());
    let mut line = 0;
    while line < line_count {
        if !(openings.contains(&line) && is_fence(line)) {
            line += 1;
            continue;
        }

        let open_line = line;
        let close_line = (open_line + 1..line_count).find(|&l| is_fence(l));
        let start = document.line_to_char(open_line);
        let end = match close_line {
            Some(close) => document.line_end_char(close),
            None => document.char_count(),
        };

        blocks.push(CodeBlock {
            span: CodeBlockSpan::new(start, end),
            open_line,
            close_line,
        });

        match close_line {
            Some(close) => line = close + 1,
            None => break,
        }
    }

    blocks
}

/// Spans of every located region, in document order.
pub fn locate_spans(document: &Document, classifier: &dyn FenceClassifier) -> Vec<CodeBlockSpan> {
    locate_blocks(document, classifier)
        .into_iter()
        .map(|block| block.span)
        .collect()
}

/// Find the region containing the caret at `offset`.
///
/// `blocks` must be in document order, as returned by [`locate_blocks`].
pub fn enclosing_block(blocks: &[CodeBlock], offset: usize) -> Option<&CodeBlock> {
    let idx = blocks.partition_point(|block| block.span.start <= offset);
    let candidate = blocks.get(idx.checked_sub(1)?)?;
    candidate.contains_offset(offset).then_some(candidate)
}
