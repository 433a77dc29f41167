//! Inline fold renderer
//!
//! Materializes decorations from the located blocks and the fold store. A render pass is a pure
//! read of fold state; the only side effects are recording first-seen blocks in the
//! initialization set and queueing their default collapse for the next tick.

use crate::config::ViewConfiguration;
use crate::decorations::{CollapsedPreview, Decoration, FoldButton};
use crate::document::Document;
use crate::initialization::InitializationSet;
use crate::intervals::FoldStore;
use crate::locator::CodeBlock;
use crate::protocol::ToggleRequest;
use crate::resolver::DefaultStateResolver;
use crate::scheduler::RequestQueue;
use std::ops::Range;
use tracing::trace;

/// Borrowed inputs of one render pass.
#[derive(Debug, Clone, Copy)]
pub struct RenderPass<'a> {
    /// Current document snapshot.
    pub document: &'a Document,
    /// View configuration.
    pub config: &'a ViewConfiguration,
    /// Fold state after the last reduction cycle.
    pub store: &'a FoldStore,
    /// Default-state resolver for first-seen blocks.
    pub resolver: &'a DefaultStateResolver,
    /// Document version the pass renders.
    pub version: u64,
}

impl RenderPass<'_> {
    /// Render every block touching `visible` (all blocks when `None`).
    pub fn run(
        &self,
        blocks: &[CodeBlock],
        visible: Option<Range<usize>>,
        initialized: &mut InitializationSet,
        deferred: &mut RequestQueue,
    ) -> Vec<Decoration> {
        let mut decorations = Vec::new();

        for block in blocks {
            let span = block.span;
            if let Some(range) = &visible
                && !span.touches(range.start, range.end)
            {
                continue;
            }

            let folded = self.store.is_folded(span);
            if initialized.insert(span) && !folded && self.resolver.resolve(span) {
                trace!(
                    start = span.start,
                    end = span.end,
                    version = self.version,
                    "scheduling default collapse"
                );
                deferred.push(self.version, ToggleRequest::collapse(span));
            }

            decorations.push(if folded {
                self.collapsed(block)
            } else {
                let button = self.button(&self.config.collapse_icon, ToggleRequest::toggle(span));
                Decoration::toggle(span, button)
            });
        }

        decorations
    }

    fn button(&self, icon: &str, action: ToggleRequest) -> FoldButton {
        FoldButton {
            icon: icon.to_string(),
            alignment: self.config.button_alignment,
            transparent: self.config.transparent_button,
            action,
        }
    }

    fn collapsed(&self, block: &CodeBlock) -> Decoration {
        let content = content_lines(self.document, block);
        let shown = content.len().min(self.config.collapsed_line_count);
        let preview = CollapsedPreview {
            hidden_line_count: content.len() - shown,
            lines: content.into_iter().take(shown).collect(),
            horizontal_scroll: self.config.horizontal_scroll_enabled,
        };
        let button = self.button(&self.config.expand_icon, ToggleRequest::expand(block.span));
        Decoration::collapsed(block.span, button, preview)
    }
}

/// Raw text of the lines between the fences of `block`.
///
/// An unterminated block that ends with a line break does not count the empty last line.
pub fn content_lines(document: &Document, block: &CodeBlock) -> Vec<String> {
    let mut lines: Vec<String> = block
        .content_lines(document.line_count())
        .filter_map(|line| document.line_text(line))
        .collect();

    if !block.is_terminated() && lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}
