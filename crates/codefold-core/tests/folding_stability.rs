use codefold_core::{
    CodeBlockSpan, Document, FenceClassifier, FoldStore, FoldView, TextDelta, TextDeltaEdit,
    ToggleRequest, ViewConfiguration, locate_spans,
};
use std::collections::BTreeSet;

const TEXT: &str = "# Title\n```\none\ntwo\n```\n\n```py\nthree\n```\n";

fn collapsed_by_default() -> ViewConfiguration {
    ViewConfiguration {
        default_collapsed: true,
        ..ViewConfiguration::default()
    }
}

#[test]
fn test_folds_shift_on_newline_insertion_above() {
    let mut view = FoldView::new("a.md", TEXT, ViewConfiguration::default());
    let spans = view.spans();
    view.collapse(spans[1]);

    view.edit(TextDelta::single(TextDeltaEdit::insert(0, "\n"))).unwrap();

    let spans = view.spans();
    assert!(!view.is_folded(spans[0]));
    assert!(view.is_folded(spans[1]));
    assert_eq!(view.store().spans(), &[spans[1]]);
}

#[test]
fn test_folds_survive_edits_between_blocks() {
    let mut view = FoldView::new("a.md", TEXT, ViewConfiguration::default());
    let spans = view.spans();
    view.collapse(spans[0]);
    view.collapse(spans[1]);

    // The blank line between the two blocks.
    let gap = spans[0].end + 1;
    view.edit(TextDelta::single(TextDeltaEdit::insert(gap, "between"))).unwrap();

    let after = view.spans();
    assert_eq!(after[0], spans[0]);
    assert_eq!(after[1], CodeBlockSpan::new(spans[1].start + 7, spans[1].end + 7));
    assert!(view.is_folded(after[0]));
    assert!(view.is_folded(after[1]));
}

#[test]
fn test_typing_after_closing_fence_does_not_reapply_default() {
    let mut view = FoldView::new("a.md", TEXT, collapsed_by_default());
    view.tick();
    let span = view.spans()[0];
    view.expand(span);

    // "```" -> "```x": the block end moves but it is the same block.
    view.edit(TextDelta::single(TextDeltaEdit::insert(span.end, "x"))).unwrap();
    assert_eq!(view.spans()[0], CodeBlockSpan::new(span.start, span.end + 1));
    assert_eq!(view.pending_requests(), 0);
    assert!(!view.tick());
    assert!(!view.is_folded(view.spans()[0]));
}

#[test]
fn test_new_block_typed_by_user_gets_default() {
    let mut view = FoldView::new("a.md", "text\n", collapsed_by_default());
    assert_eq!(view.pending_requests(), 0);

    view.edit(TextDelta::single(TextDeltaEdit::insert(5, "```\ncode\n```"))).unwrap();
    assert_eq!(view.pending_requests(), 1);
    view.tick();
    assert!(view.is_folded(view.spans()[0]));
}

#[test]
fn test_multi_edit_delta_remaps_sequentially() {
    let mut store = FoldStore::new();
    store.apply(&ToggleRequest::collapse(CodeBlockSpan::new(10, 20)));
    store.apply(&ToggleRequest::collapse(CodeBlockSpan::new(30, 40)));

    let delta = TextDelta::new()
        .with_edit(TextDeltaEdit::delete(0, 5))
        .with_edit(TextDeltaEdit::insert(20, "abc"));
    let next = store.reduce(&delta, &[]);

    // 10..20 -> 5..15, untouched by the insert at 20 (which lands in the gap).
    // 30..40 -> 25..35 -> 28..38.
    assert_eq!(next.spans(), &[CodeBlockSpan::new(5, 15), CodeBlockSpan::new(28, 38)]);
}

struct RustOnly;

impl FenceClassifier for RustOnly {
    fn fence_openings(&self, document: &Document) -> BTreeSet<usize> {
        (0..document.line_count())
            .filter(|&line| document.line_text(line).as_deref() == Some("```rust"))
            .collect()
    }
}

#[test]
fn test_host_classifier_decides_openings() {
    let text = "```py\na\n```\n```rust\nb\n```";
    let document = Document::from_text(text);
    assert_eq!(locate_spans(&document, &RustOnly), vec![CodeBlockSpan::new(12, 25)]);

    let view =
        FoldView::with_classifier("a.md", text, ViewConfiguration::default(), Box::new(RustOnly));
    assert_eq!(view.spans(), vec![CodeBlockSpan::new(12, 25)]);
}
