//! Code block processing for the rendered preview.

use crate::element::PreviewElement;
use codefold_core::{ButtonAlignment, DefaultStateResolver, ViewConfiguration};
use tracing::trace;

/// Marks a `<pre>` element that already received its fold button.
pub const PROCESSED_ATTR: &str = "data-codefold-processed";
/// Number of lines a collapsed block keeps visible.
pub const VISIBLE_LINES_ATTR: &str = "data-codefold-lines";
/// Class on every processed `<pre>` element.
pub const BLOCK_CLASS: &str = "codefold-block";
/// Class on a collapsed `<pre>` element. This is the per-element fold flag.
pub const COLLAPSED_CLASS: &str = "codefold-collapsed";
/// Class on processed blocks that scroll horizontally.
pub const HSCROLL_CLASS: &str = "codefold-hscroll";
/// Class on the fold button.
pub const BUTTON_CLASS: &str = "codefold-button";
/// Class on a fold button drawn without background.
pub const TRANSPARENT_CLASS: &str = "codefold-button-transparent";

/// Attaches fold buttons to the code blocks of a rendered preview.
///
/// The preview keeps its own fold flag on each element. It shares configuration with the
/// live-editing view but never reads or writes its fold store.
#[derive(Debug, Clone)]
pub struct PreviewProcessor {
    config: ViewConfiguration,
    starts_collapsed: bool,
}

impl PreviewProcessor {
    /// Create a processor for the document whose source is `document_text`.
    pub fn new(config: &ViewConfiguration, document_text: &str) -> Self {
        Self {
            starts_collapsed: DefaultStateResolver::new(document_text, config).starts_collapsed(),
            config: config.clone(),
        }
    }

    /// Whether newly processed blocks start collapsed.
    pub fn starts_collapsed(&self) -> bool {
        self.starts_collapsed
    }

    /// Process every unprocessed code block in `root` (including `root` itself).
    ///
    /// Returns the number of blocks processed. Processing the same subtree again does nothing.
    pub fn process_subtree(&self, root: &mut PreviewElement) -> usize {
        let mut processed = 0;
        root.walk_mut(&mut |element: &mut PreviewElement| {
            if is_code_block(element) && element.attr(PROCESSED_ATTR).is_none() {
                self.process_block(element);
                processed += 1;
            }
        });

        if processed > 0 {
            trace!(processed, "preview code blocks processed");
        }
        processed
    }

    fn process_block(&self, pre: &mut PreviewElement) {
        pre.set_attr(PROCESSED_ATTR, "true");
        pre.set_attr(VISIBLE_LINES_ATTR, self.config.collapsed_line_count.to_string());
        pre.set_class(BLOCK_CLASS, true);
        pre.set_class(HSCROLL_CLASS, self.config.horizontal_scroll_enabled);
        pre.set_class(COLLAPSED_CLASS, self.starts_collapsed);

        let alignment = match self.config.button_alignment {
            ButtonAlignment::Left => "codefold-button-left",
            ButtonAlignment::Right => "codefold-button-right",
        };
        let mut button = PreviewElement::new("button")
            .with_class(BUTTON_CLASS)
            .with_class(alignment)
            .with_text(self.icon(self.starts_collapsed));
        button.set_class(TRANSPARENT_CLASS, self.config.transparent_button);
        pre.children.insert(0, button);
    }

    fn icon(&self, collapsed: bool) -> &str {
        if collapsed {
            &self.config.expand_icon
        } else {
            &self.config.collapse_icon
        }
    }

    /// Flip the fold flag of a processed block. Returns the new state, or `None` if `pre` was
    /// never processed.
    pub fn toggle(&self, pre: &mut PreviewElement) -> Option<bool> {
        pre.attr(PROCESSED_ATTR)?;

        let collapsed = !pre.has_class(COLLAPSED_CLASS);
        pre.set_class(COLLAPSED_CLASS, collapsed);
        let icon = self.icon(collapsed).to_string();
        if let Some(button) = pre
            .children
            .iter_mut()
            .find(|child| child.has_class(BUTTON_CLASS))
        {
            button.text = icon;
        }
        Some(collapsed)
    }

    /// Lines of code currently shown by a block.
    pub fn visible_lines(&self, pre: &PreviewElement) -> Vec<String> {
        let code = pre.child("code").map(|c| c.text_content()).unwrap_or_default();
        let lines = code.lines().map(str::to_string);
        if is_collapsed(pre) {
            lines.take(self.config.collapsed_line_count).collect()
        } else {
            lines.collect()
        }
    }
}

/// Whether `pre` is a collapsed preview block.
pub fn is_collapsed(pre: &PreviewElement) -> bool {
    pre.has_class(COLLAPSED_CLASS)
}

fn is_code_block(element: &PreviewElement) -> bool {
    element.tag == "pre" && element.child("code").is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> ViewConfiguration {
        ViewConfiguration {
            collapsed_line_count: 1,
            button_alignment: ButtonAlignment::Right,
            transparent_button: true,
            ..ViewConfiguration::default()
        }
    }

    #[test]
    fn test_process_adds_button_once() {
        let processor = PreviewProcessor::new(&config(), "text");
        let mut root = PreviewElement::new("div")
            .with_child(PreviewElement::code_block("a\nb"))
            .with_child(PreviewElement::new("pre").with_text("no code child"));

        assert_eq!(processor.process_subtree(&mut root), 1);
        assert_eq!(processor.process_subtree(&mut root), 0);

        let pre = &root.children[0];
        assert_eq!(pre.children.len(), 2);
        let button = &pre.children[0];
        assert_eq!(button.text, "▼");
        assert!(button.has_class("codefold-button-right"));
        assert!(button.has_class(TRANSPARENT_CLASS));
        assert!(!is_collapsed(pre));
        assert_eq!(pre.attr(VISIBLE_LINES_ATTR), Some("1"));
    }

    #[test]
    fn test_frontmatter_override_applies_to_preview() {
        let processor = PreviewProcessor::new(&config(), "---\ncode-blocks: collapsed\n---\n");
        let mut pre = PreviewElement::code_block("a\nb\nc");
        processor.process_subtree(&mut pre);

        assert!(is_collapsed(&pre));
        assert_eq!(pre.children[0].text, "▶");
        assert_eq!(processor.visible_lines(&pre), vec!["a".to_string()]);
    }

    #[test]
    fn test_toggle_flips_flag_and_icon() {
        let processor = PreviewProcessor::new(&config(), "");
        let mut pre = PreviewElement::code_block("a\nb");
        assert_eq!(processor.toggle(&mut pre), None);

        processor.process_subtree(&mut pre);
        assert_eq!(processor.toggle(&mut pre), Some(true));
        assert_eq!(pre.children[0].text, "▶");
        assert_eq!(processor.toggle(&mut pre), Some(false));
        assert_eq!(processor.visible_lines(&pre), vec!["a".to_string(), "b".to_string()]);
    }
}
