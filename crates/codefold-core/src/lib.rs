#![warn(missing_docs)]
//! Codefold Core - headless fold-state engine for fenced code blocks
//!
//! # Overview
//!
//! `codefold-core` tracks which triple-backtick code blocks of a markdown document are folded in
//! the live-editing surface. It does not draw anything: hosts read [`Decoration`]s (a toggle
//! button for an unfolded block, a single summary block for a folded one) and feed back edits
//! and button activations.
//!
//! # Core Features
//!
//! - **Region Location**: fence pairing backed by a pluggable syntax oracle ([`FenceClassifier`])
//! - **Fold Store**: sorted span set with binary search, remapped across edits
//! - **Edit Safety**: any edit touching a folded block expands it in the same cycle
//! - **Default State**: per-document front-matter override, then the global default, applied
//!   once per block per document-open lifetime
//! - **State Tracking**: version numbers and change notifications
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  FoldView (cycle, commands, notifications)  │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Renderer + Deferred Queue + Init Set       │  ← Decorations
//! ├─────────────────────────────────────────────┤
//! │  Guard + Toggle Protocol + Fold Store       │  ← Fold State
//! ├─────────────────────────────────────────────┤
//! │  Region Locator + Fence Classifier          │  ← Structure
//! ├─────────────────────────────────────────────┤
//! │  Document (Rope) + TextDelta mapping        │  ← Text
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use codefold_core::{FoldView, TextDelta, TextDeltaEdit, ViewConfiguration};
//!
//! let text = "---\ncode-blocks: collapsed\n---\n```sh\nls\n```\n";
//! let mut view = FoldView::new("notes.md", text, ViewConfiguration::default());
//!
//! // Default collapse is scheduled while rendering and applied on the next tick.
//! view.tick();
//! let span = view.spans()[0];
//! assert!(view.is_folded(span));
//!
//! // Typing inside the folded block expands it.
//! view.edit(TextDelta::single(TextDeltaEdit::insert(span.start + 8, "-la "))).unwrap();
//! assert!(!view.is_folded(view.spans()[0]));
//! ```
//!
//! # Module Description
//!
//! - [`delta`] - text deltas and position mapping
//! - [`document`] - rope-backed document snapshot
//! - [`syntax`] - fence classification
//! - [`locator`] - code block location
//! - [`intervals`] - spans and the fold store
//! - [`protocol`] - toggle requests and transactions
//! - [`guard`] - auto-expand on edit
//! - [`resolver`] - default fold state
//! - [`render`] - decoration materialization
//! - [`view`] - the fold view
//! - [`commands`] - command entry points

pub mod commands;
pub mod config;
pub mod decorations;
pub mod delta;
pub mod document;
mod error;
pub mod guard;
pub mod initialization;
pub mod intervals;
pub mod locator;
pub mod protocol;
pub mod render;
pub mod resolver;
pub mod scheduler;
pub mod syntax;
pub mod view;

pub use commands::{
    CommandDescriptor, CommandResult, FoldCommand, Hotkey, Modifier, TOGGLE_CODE_BLOCK,
};
pub use config::{ButtonAlignment, ViewConfiguration};
pub use decorations::{
    CollapsedPreview, Decoration, DecorationKind, DecorationLayerId, DecorationPlacement,
    DecorationRange, FoldButton,
};
pub use delta::{Assoc, TextDelta, TextDeltaEdit};
pub use document::Document;
pub use error::FoldError;
pub use guard::expand_touched_folds;
pub use initialization::{BlockId, DocumentId, InitializationSet};
pub use intervals::{CodeBlockSpan, FoldStore};
pub use locator::{CodeBlock, enclosing_block, locate_blocks, locate_spans};
pub use protocol::{FoldIntent, ToggleRequest, Transaction};
pub use resolver::{CollapseOverride, DefaultStateResolver};
pub use scheduler::{QueuedRequest, RequestQueue};
pub use syntax::{FenceClassifier, MarkdownFenceClassifier, is_fence_line};
pub use view::{
    DecorationsState, DocumentState, FoldEntry, FoldView, FoldingState, StateChange,
    StateChangeCallback, StateChangeType,
};
