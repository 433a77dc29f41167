use codefold_core::{
    FoldView, MarkdownFenceClassifier, TextDelta, TextDeltaEdit, ViewConfiguration, locate_spans,
};
use proptest::prelude::*;
use proptest::sample::Index;

/// Lines documents are built from: real fences, look-alikes and plain text.
const LINES: &[&str] = &[
    "```", "```rust", "````", "   ```py", "    ```", "```a```", "`inline`", "text", "", "---",
    "x = 1", "你好",
];

fn arb_document() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(LINES), 0..16).prop_map(|lines| lines.join("\n"))
}

/// A document plus one in-range replacement that changes something.
fn arb_document_and_edit() -> impl Strategy<Value = (String, TextDeltaEdit)> {
    arb_document().prop_flat_map(|text| {
        let len = text.chars().count();
        (Just(text), 0..=len, 0..=6usize, "[a-z`\n]{0,4}").prop_map(
            move |(text, start, delete, insert)| {
                let end = (start + delete).min(len);
                (text, TextDeltaEdit::replace(start, end, insert))
            },
        )
    })
}

fn config() -> ViewConfiguration {
    ViewConfiguration {
        default_collapsed: false,
        ..ViewConfiguration::default()
    }
}

proptest! {
    /// Located spans are non-empty, strictly ascending, disjoint and inside the document.
    #[test]
    fn prop_spans_are_ordered_and_disjoint(text in arb_document()) {
        let view = FoldView::new("a.md", &text, config());
        let spans = locate_spans(view.document(), &MarkdownFenceClassifier);

        for span in &spans {
            prop_assert!(span.start < span.end);
            prop_assert!(span.end <= view.document().char_count());
        }
        for pair in spans.windows(2) {
            prop_assert!(pair[0].end < pair[1].start, "overlapping spans: {:?}", pair);
        }
    }

    /// No edit ever commits while touching a folded block.
    #[test]
    fn prop_edits_never_land_in_folds((text, edit) in arb_document_and_edit()) {
        prop_assume!(!edit.is_noop());

        let mut view = FoldView::new("a.md", &text, config());
        let folded = view.spans();
        for &span in &folded {
            view.collapse(span);
        }

        let delta = TextDelta::single(edit.clone());
        view.edit(delta.clone()).unwrap();

        for span in folded.iter().filter(|span| span.touches(edit.start, edit.end())) {
            if let Some(mapped) = span.map_through(&delta) {
                prop_assert!(!view.is_folded(mapped), "{:?} still folded after {:?}", mapped, edit);
            }
        }
    }

    /// Toggling a block twice restores the fold store.
    #[test]
    fn prop_double_toggle_is_identity(
        text in arb_document(),
        folds in prop::collection::vec(any::<bool>(), 16),
        pick in any::<Index>(),
    ) {
        let mut view = FoldView::new("a.md", &text, config());
        let spans = view.spans();
        prop_assume!(!spans.is_empty());

        for (&span, &fold) in spans.iter().zip(&folds) {
            if fold {
                view.collapse(span);
            }
        }

        let before = view.store().clone();
        let span = spans[pick.index(spans.len())];
        prop_assert!(view.toggle(span));
        prop_assert!(view.toggle(span));
        prop_assert_eq!(view.store(), &before);
    }
}
