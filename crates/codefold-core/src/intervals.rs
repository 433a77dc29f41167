//! Spans and the fold state store
//!
//! [`CodeBlockSpan`] is the half-open character range of one fenced region. [`FoldStore`] keeps
//! the set of folded spans in a sorted vector with binary search, remaps it across document
//! changes and applies [`ToggleRequest`]s.

use crate::delta::{Assoc, TextDelta, TextDeltaEdit};
use crate::protocol::ToggleRequest;
use tracing::trace;

/// Half-open character range (`start..end`) of a fenced code region, fence lines included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CodeBlockSpan {
    /// Start offset (inclusive): the first character of the opening fence line.
    pub start: usize,
    /// End offset (exclusive): the end of the closing fence line, or the document end.
    pub end: usize,
}

impl CodeBlockSpan {
    /// Create a span from `start..end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the span is zero-width (or inverted).
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check if span contains a specific position
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Check if two spans overlap
    pub fn overlaps(&self, other: &CodeBlockSpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check if the range `start..=end` overlaps the span or touches one of its boundaries.
    pub fn touches(&self, start: usize, end: usize) -> bool {
        start <= self.end && self.start <= end
    }

    /// Map the span through a single edit.
    ///
    /// Returns `None` when the edit removes the whole span or leaves it zero-width.
    pub fn map_through_edit(&self, edit: &TextDeltaEdit) -> Option<Self> {
        if edit.deleted_len > 0 && edit.start <= self.start && edit.end() >= self.end {
            return None;
        }

        // Text inserted at the start pushes the span right; text inserted at the end stays outside.
        let start = edit.map_pos(self.start, Assoc::After);
        let end = edit.map_pos(self.end, Assoc::Before);
        (start < end).then_some(Self::new(start, end))
    }

    /// Map the span through every edit of `delta` in order.
    pub fn map_through(&self, delta: &TextDelta) -> Option<Self> {
        delta
            .edits
            .iter()
            .try_fold(*self, |span, edit| span.map_through_edit(edit))
    }
}

/// Fold state store
///
/// Holds the folded spans, sorted by `(start, end)` and unique. A span absent from the store is
/// unfolded. Lookups are by exact offsets.
///
/// Query complexity: O(log n + k), where k is the number of spans touching the queried range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoldStore {
    folded: Vec<CodeBlockSpan>,
    /// Prefix maximum end position: `prefix_max_end[i] = max(folded[0..=i].end)`
    ///
    /// Lets `query_range` stop scanning backward once no earlier span can reach the range.
    prefix_max_end: Vec<usize>,
}

impl FoldStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn rebuild_prefix_max_end_from(&mut self, start_idx: usize) {
        self.prefix_max_end.resize(self.folded.len(), 0);

        let mut max_end = if start_idx == 0 {
            0
        } else {
            self.prefix_max_end[start_idx - 1]
        };

        for (idx, span) in self.folded.iter().enumerate().skip(start_idx) {
            max_end = max_end.max(span.end);
            self.prefix_max_end[idx] = max_end;
        }
    }

    /// Whether `span` is folded.
    pub fn is_folded(&self, span: CodeBlockSpan) -> bool {
        self.folded.binary_search(&span).is_ok()
    }

    /// Folded spans in ascending order.
    pub fn spans(&self) -> &[CodeBlockSpan] {
        &self.folded
    }

    /// Number of folded spans.
    pub fn len(&self) -> usize {
        self.folded.len()
    }

    /// Check if nothing is folded.
    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }

    /// Folded spans overlapping `start..=end` or touching its boundaries.
    pub fn query_range(&self, start: usize, end: usize) -> Vec<CodeBlockSpan> {
        // Spans starting after `end` cannot touch the range.
        let search_end = self.folded.partition_point(|s| s.start <= end);
        if search_end == 0 {
            return Vec::new();
        }

        let mut scan_start = self.folded.partition_point(|s| s.start < start).min(search_end);
        while scan_start > 0 && self.prefix_max_end[scan_start - 1] >= start {
            scan_start -= 1;
        }

        self.folded[scan_start..search_end]
            .iter()
            .filter(|span| span.touches(start, end))
            .copied()
            .collect()
    }

    fn insert(&mut self, span: CodeBlockSpan) -> bool {
        match self.folded.binary_search(&span) {
            Ok(_) => false,
            Err(pos) => {
                self.folded.insert(pos, span);
                self.prefix_max_end.insert(pos, 0);
                self.rebuild_prefix_max_end_from(pos);
                true
            }
        }
    }

    fn remove(&mut self, span: CodeBlockSpan) -> bool {
        match self.folded.binary_search(&span) {
            Ok(pos) => {
                self.folded.remove(pos);
                self.prefix_max_end.remove(pos);
                if pos < self.folded.len() {
                    self.rebuild_prefix_max_end_from(pos);
                }
                true
            }
            Err(_) => false,
        }
    }

    /// Apply one request. Returns `true` if the store changed.
    ///
    /// - force-expand removes the exact span (no-op if absent)
    /// - force-collapse inserts it (no-op if already folded)
    /// - toggle removes an existing fold, otherwise inserts one
    pub fn apply(&mut self, request: &ToggleRequest) -> bool {
        let span = request.span();
        if span.is_empty() {
            trace!(from = span.start, to = span.end, "ignoring zero-width fold request");
            return false;
        }

        match request.desired {
            Some(false) => self.remove(span),
            Some(true) => self.insert(span),
            None => self.remove(span) || self.insert(span),
        }
    }

    /// Remap every folded span through `delta`, dropping spans that were deleted or became
    /// zero-width. Returns the number of dropped spans.
    pub fn remap(&mut self, delta: &TextDelta) -> usize {
        if delta.is_empty() || self.folded.is_empty() {
            return 0;
        }

        let before = self.folded.len();
        let mut mapped: Vec<CodeBlockSpan> = self
            .folded
            .iter()
            .filter_map(|span| span.map_through(delta))
            .collect();
        mapped.sort_unstable();
        mapped.dedup();

        let dropped = before - mapped.len();
        if dropped > 0 {
            trace!(dropped, "fold entries dropped by edit");
        }

        self.folded = mapped;
        self.rebuild_prefix_max_end_from(0);
        dropped
    }

    /// Produce the next store: remap through `delta`, then apply `requests` in order.
    ///
    /// Requests are expressed in post-change coordinates.
    pub fn reduce(&self, delta: &TextDelta, requests: &[ToggleRequest]) -> FoldStore {
        let mut next = self.clone();
        next.remap(delta);
        for request in requests {
            next.apply(request);
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::TextDeltaEdit;

    fn span(start: usize, end: usize) -> CodeBlockSpan {
        CodeBlockSpan::new(start, end)
    }

    #[test]
    fn test_span_contains_and_touches() {
        let s = span(10, 20);
        assert!(s.contains(10));
        assert!(s.contains(19));
        assert!(!s.contains(20));
        assert!(s.touches(20, 20));
        assert!(s.touches(5, 10));
        assert!(!s.touches(21, 30));
        assert!(!s.touches(0, 9));
    }

    #[test]
    fn test_span_overlaps() {
        assert!(span(10, 20).overlaps(&span(15, 25)));
        assert!(!span(10, 20).overlaps(&span(20, 30)));
    }

    #[test]
    fn test_map_insertion_at_boundaries() {
        let s = span(10, 20);
        // At the start: pushed right.
        assert_eq!(
            s.map_through_edit(&TextDeltaEdit::insert(10, "ab")),
            Some(span(12, 22))
        );
        // At the end: stays outside.
        assert_eq!(
            s.map_through_edit(&TextDeltaEdit::insert(20, "ab")),
            Some(span(10, 20))
        );
        // Inside: grows.
        assert_eq!(
            s.map_through_edit(&TextDeltaEdit::insert(15, "ab")),
            Some(span(10, 22))
        );
    }

    #[test]
    fn test_map_deletions() {
        let s = span(10, 20);
        // Covering the start clamps to the deletion start.
        assert_eq!(
            s.map_through_edit(&TextDeltaEdit::delete(5, 12)),
            Some(span(5, 13))
        );
        // Covering the end clamps the end.
        assert_eq!(
            s.map_through_edit(&TextDeltaEdit::delete(18, 25)),
            Some(span(10, 18))
        );
        // Whole span removed.
        assert_eq!(s.map_through_edit(&TextDeltaEdit::delete(8, 22)), None);
        // Whole span replaced.
        assert_eq!(s.map_through_edit(&TextDeltaEdit::replace(10, 20, "x")), None);
    }

    #[test]
    fn test_store_apply_semantics() {
        let mut store = FoldStore::new();
        let s = span(0, 10);

        assert!(!store.apply(&ToggleRequest::expand(s)));
        assert!(store.apply(&ToggleRequest::collapse(s)));
        assert!(!store.apply(&ToggleRequest::collapse(s)));
        assert!(store.is_folded(s));

        assert!(store.apply(&ToggleRequest::toggle(s)));
        assert!(!store.is_folded(s));
        assert!(store.apply(&ToggleRequest::toggle(s)));
        assert!(store.is_folded(s));

        // A request that does not match exactly is a different span.
        assert!(!store.apply(&ToggleRequest::expand(span(0, 11))));
        assert!(store.is_folded(s));
    }

    #[test]
    fn test_zero_width_request_ignored() {
        let mut store = FoldStore::new();
        assert!(!store.apply(&ToggleRequest::collapse(span(4, 4))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_query_range_prunes_and_includes_boundaries() {
        let mut store = FoldStore::new();
        for i in 0..1000usize {
            store.apply(&ToggleRequest::collapse(span(i * 10, i * 10 + 5)));
        }

        assert_eq!(store.query_range(5, 5), vec![span(0, 5)]);
        assert_eq!(store.query_range(6, 9), Vec::<CodeBlockSpan>::new());
        assert_eq!(store.query_range(9990, 9990), vec![span(9990, 9995)]);
        assert_eq!(store.query_range(4, 12), vec![span(0, 5), span(10, 15)]);
    }

    #[test]
    fn test_remap_drops_deleted_spans() {
        let mut store = FoldStore::new();
        store.apply(&ToggleRequest::collapse(span(0, 10)));
        store.apply(&ToggleRequest::collapse(span(20, 30)));

        let dropped = store.remap(&TextDelta::single(TextDeltaEdit::delete(15, 35)));
        assert_eq!(dropped, 1);
        assert_eq!(store.spans(), &[span(0, 10)]);
    }

    #[test]
    fn test_reduce_leaves_prior_state_untouched() {
        let mut prior = FoldStore::new();
        prior.apply(&ToggleRequest::collapse(span(10, 20)));

        let delta = TextDelta::single(TextDeltaEdit::insert(0, "xx"));
        let next = prior.reduce(&delta, &[ToggleRequest::collapse(span(40, 50))]);

        assert_eq!(prior.spans(), &[span(10, 20)]);
        assert_eq!(next.spans(), &[span(12, 22), span(40, 50)]);
    }
}
