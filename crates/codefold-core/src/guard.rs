//! Auto-expand-on-edit guard
//!
//! Runs before a change is committed. Every folded span the change touches (overlap, or an edit
//! boundary on a span boundary) gets a force-expand request in post-change coordinates, so an
//! edit never lands inside a collapsed block.

use crate::delta::TextDelta;
use crate::intervals::{CodeBlockSpan, FoldStore};
use crate::protocol::ToggleRequest;
use tracing::debug;

/// Force-expand requests for every folded span touched by `delta`.
///
/// Spans the change deletes outright get no request; the store drops them while remapping.
pub fn expand_touched_folds(store: &FoldStore, delta: &TextDelta) -> Vec<ToggleRequest> {
    if store.is_empty() || delta.is_empty() {
        return Vec::new();
    }

    let requests: Vec<ToggleRequest> = match delta.edits.as_slice() {
        [edit] => store
            .query_range(edit.start, edit.end())
            .into_iter()
            .filter_map(|span| span.map_through_edit(edit))
            .map(ToggleRequest::expand)
            .collect(),
        edits => {
            // Later edits address the document produced by earlier ones, so candidates are
            // carried forward edit by edit.
            let mut candidates: Vec<(CodeBlockSpan, bool)> =
                store.spans().iter().map(|&span| (span, false)).collect();
            for edit in edits {
                candidates = candidates
                    .into_iter()
                    .filter_map(|(span, touched)| {
                        let touched = touched || span.touches(edit.start, edit.end());
                        span.map_through_edit(edit).map(|mapped| (mapped, touched))
                    })
                    .collect();
            }
            candidates
                .into_iter()
                .filter(|&(_, touched)| touched)
                .map(|(span, _)| ToggleRequest::expand(span))
                .collect()
        }
    };

    if !requests.is_empty() {
        debug!(count = requests.len(), "expanding folds touched by edit");
    }
    requests
}
