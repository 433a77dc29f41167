//! View configuration

use codefold_settings::{CodeFoldSettings, DEFAULT_COLLAPSE_ICON, DEFAULT_EXPAND_ICON};

pub use codefold_settings::ButtonAlignment;

/// Immutable configuration for the life of a view.
///
/// Replacing it (see `FoldView::reconfigure`) rebuilds every decoration; fold state is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfiguration {
    /// Whether newly discovered blocks start folded when the document has no override.
    pub default_collapsed: bool,
    /// Icon on an unfolded block's toggle (activating it folds the block).
    pub collapse_icon: String,
    /// Icon on a folded block's header (activating it unfolds the block).
    pub expand_icon: String,
    /// Number of content lines a folded block still shows.
    pub collapsed_line_count: usize,
    /// Whether folded previews scroll horizontally instead of wrapping.
    pub horizontal_scroll_enabled: bool,
    /// Side the fold button is drawn on.
    pub button_alignment: ButtonAlignment,
    /// Whether the fold button has no background.
    pub transparent_button: bool,
}

impl Default for ViewConfiguration {
    fn default() -> Self {
        Self {
            default_collapsed: false,
            collapse_icon: DEFAULT_COLLAPSE_ICON.to_string(),
            expand_icon: DEFAULT_EXPAND_ICON.to_string(),
            collapsed_line_count: 0,
            horizontal_scroll_enabled: true,
            button_alignment: ButtonAlignment::Left,
            transparent_button: false,
        }
    }
}

impl From<&CodeFoldSettings> for ViewConfiguration {
    fn from(settings: &CodeFoldSettings) -> Self {
        let settings = settings.sanitized();
        Self {
            default_collapsed: settings.default_collapsed,
            collapsed_line_count: settings.collapsed_line_count(),
            horizontal_scroll_enabled: settings.enable_horizontal_scroll,
            button_alignment: settings.button_alignment,
            transparent_button: settings.transparent_button,
            collapse_icon: settings.collapse_icon,
            expand_icon: settings.expand_icon,
        }
    }
}

impl From<CodeFoldSettings> for ViewConfiguration {
    fn from(settings: CodeFoldSettings) -> Self {
        Self::from(&settings)
    }
}
