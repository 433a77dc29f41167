//! Command entry points
//!
//! Fold commands a host can bind to keys or menu items. Executing one (see
//! `FoldView::execute`) turns it into a [`ToggleRequest`] and commits it in a request-only
//! reduction cycle.

use crate::intervals::CodeBlockSpan;
use crate::locator::{CodeBlock, enclosing_block};
use crate::protocol::ToggleRequest;
use std::fmt;

/// A hotkey modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// Ctrl on Linux/Windows, Cmd on macOS.
    Mod,
    /// Shift.
    Shift,
    /// Alt / Option.
    Alt,
}

impl Modifier {
    /// Display name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mod => "Mod",
            Self::Shift => "Shift",
            Self::Alt => "Alt",
        }
    }
}

/// A default key binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hotkey {
    /// Modifiers held down.
    pub modifiers: &'static [Modifier],
    /// Key name.
    pub key: &'static str,
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in self.modifiers {
            write!(f, "{}+", modifier.as_str())?;
        }
        f.write_str(self.key)
    }
}

/// Registration data for a host command palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDescriptor {
    /// Stable command id.
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Default key binding.
    pub hotkey: Hotkey,
}

/// "Toggle code block containing cursor".
pub const TOGGLE_CODE_BLOCK: CommandDescriptor = CommandDescriptor {
    id: "toggle-code-block",
    name: "Toggle code block containing cursor",
    hotkey: Hotkey {
        modifiers: &[Modifier::Mod, Modifier::Shift],
        key: "K",
    },
};

/// Commands accepted by the fold view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldCommand {
    /// Toggle the block containing the caret
    ToggleAtCursor {
        /// Caret character offset.
        offset: usize,
    },
    /// Toggle a block
    Toggle {
        /// Block span.
        span: CodeBlockSpan,
    },
    /// Fold a block
    Collapse {
        /// Block span.
        span: CodeBlockSpan,
    },
    /// Unfold a block
    Expand {
        /// Block span.
        span: CodeBlockSpan,
    },
}

impl FoldCommand {
    /// Resolve the command against the current blocks.
    ///
    /// Returns `None` when the caret is outside every block.
    pub fn to_request(&self, blocks: &[CodeBlock]) -> Option<ToggleRequest> {
        match *self {
            Self::ToggleAtCursor { offset } => {
                enclosing_block(blocks, offset).map(|block| ToggleRequest::toggle(block.span))
            }
            Self::Toggle { span } => Some(ToggleRequest::toggle(span)),
            Self::Collapse { span } => Some(ToggleRequest::collapse(span)),
            Self::Expand { span } => Some(ToggleRequest::expand(span)),
        }
    }
}

/// Command execution result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    /// The request was committed.
    Applied(ToggleRequest),
    /// The caret is not inside any block; nothing happened.
    NoRegion,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor() {
        assert_eq!(TOGGLE_CODE_BLOCK.id, "toggle-code-block");
        assert_eq!(TOGGLE_CODE_BLOCK.hotkey.to_string(), "Mod+Shift+K");
    }

    #[test]
    fn test_cursor_resolution() {
        let span = CodeBlockSpan::new(2, 11);
        let blocks = [CodeBlock {
            span,
            open_line: 1,
            close_line: Some(3),
        }];

        assert_eq!(
            FoldCommand::ToggleAtCursor { offset: 5 }.to_request(&blocks),
            Some(ToggleRequest::toggle(span))
        );
        assert_eq!(FoldCommand::ToggleAtCursor { offset: 0 }.to_request(&blocks), None);
        assert_eq!(
            FoldCommand::Expand { span }.to_request(&[]),
            Some(ToggleRequest::expand(span))
        );
    }
}
