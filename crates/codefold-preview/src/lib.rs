#![warn(missing_docs)]
//! `codefold-preview` - fold buttons for the rendered preview surface.
//!
//! The preview is owned by the host; this crate models just enough of it to attach a fold button
//! to each rendered code block and keep a per-element collapsed flag:
//!
//! - [`PreviewProcessor::process_subtree`] processes a newly inserted subtree (idempotent)
//! - [`PreviewObserver`] decides which insertions to process
//!
//! The preview's fold flags are independent of the live-editing view: toggling a block here never
//! touches a `FoldView`, and the other way round.

mod element;
mod observer;
mod processor;

pub use element::PreviewElement;
pub use observer::{NodeId, PreviewObserver};
pub use processor::{
    BLOCK_CLASS, BUTTON_CLASS, COLLAPSED_CLASS, HSCROLL_CLASS, PROCESSED_ATTR, PreviewProcessor,
    TRANSPARENT_CLASS, VISIBLE_LINES_ATTR, is_collapsed,
};
