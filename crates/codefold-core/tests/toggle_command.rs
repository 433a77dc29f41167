use codefold_core::{
    CommandResult, FoldCommand, FoldView, TOGGLE_CODE_BLOCK, ToggleRequest, ViewConfiguration,
};

// "intro" 0..5, block 6..22, "outro" 23..28
const TEXT: &str = "intro\n```js\nlet x;\n```\noutro";

fn view(default_collapsed: bool) -> FoldView {
    FoldView::new(
        "a.md",
        TEXT,
        ViewConfiguration {
            default_collapsed,
            ..ViewConfiguration::default()
        },
    )
}

#[test]
fn test_command_descriptor() {
    assert_eq!(TOGGLE_CODE_BLOCK.id, "toggle-code-block");
    assert_eq!(TOGGLE_CODE_BLOCK.hotkey.to_string(), "Mod+Shift+K");
}

#[test]
fn test_toggle_at_cursor_inside_block() {
    let mut view = view(false);
    let span = view.spans()[0];
    assert_eq!((span.start, span.end), (6, 22));

    let result = view.execute(FoldCommand::ToggleAtCursor { offset: 14 });
    assert_eq!(result, CommandResult::Applied(ToggleRequest::toggle(span)));
    assert!(view.is_folded(span));

    view.execute(FoldCommand::ToggleAtCursor { offset: 14 });
    assert!(!view.is_folded(span));
}

#[test]
fn test_toggle_on_fence_lines() {
    let mut view = view(false);
    let span = view.spans()[0];

    view.execute(FoldCommand::ToggleAtCursor { offset: span.start });
    assert!(view.is_folded(span));
    view.execute(FoldCommand::ToggleAtCursor { offset: span.end });
    assert!(!view.is_folded(span));
}

#[test]
fn test_toggle_outside_any_block_is_noop() {
    let mut view = view(false);
    let version = view.version();

    assert_eq!(view.execute(FoldCommand::ToggleAtCursor { offset: 2 }), CommandResult::NoRegion);
    assert_eq!(view.execute(FoldCommand::ToggleAtCursor { offset: 28 }), CommandResult::NoRegion);
    assert_eq!(view.version(), version);
    assert!(view.store().is_empty());
}

#[test]
fn test_pending_default_applies_before_command() {
    let mut view = view(true);
    let span = view.spans()[0];
    assert_eq!(view.pending_requests(), 1);

    // The block is folded by its default first, so the toggle unfolds it.
    view.execute(FoldCommand::ToggleAtCursor { offset: 14 });
    assert_eq!(view.pending_requests(), 0);
    assert!(!view.is_folded(span));
}

#[test]
fn test_explicit_span_commands() {
    let mut view = view(false);
    let span = view.spans()[0];

    view.execute(FoldCommand::Collapse { span });
    assert!(view.is_folded(span));
    view.execute(FoldCommand::Collapse { span });
    assert!(view.is_folded(span));
    view.execute(FoldCommand::Expand { span });
    assert!(!view.is_folded(span));
    view.execute(FoldCommand::Toggle { span });
    assert!(view.is_folded(span));
}
