//! Document snapshot
//!
//! Rope-backed document text with O(log N) line access. Offsets are character offsets; line
//! numbers are zero-based logical lines (a trailing newline yields a final empty line).
//! Lines end at `\n`; a `\r` before it is not part of the line text. Other Unicode line
//! separators are ordinary characters, which keeps line numbers in step with `str::lines`.

use crate::delta::{TextDelta, TextDeltaEdit};
use crate::error::FoldError;
use ropey::Rope;

/// A document snapshot.
///
/// Cloning is cheap (the rope shares its nodes), which lets a change be validated on a copy
/// before it is committed.
#[derive(Debug, Clone, Default)]
pub struct Document {
    rope: Rope,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build a document from text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Get the complete text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Get total character count.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Get total line count.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get text of the specified line (excluding the line break).
    pub fn line_text(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }

        let mut text = self.rope.line(line).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        if text.ends_with('\r') {
            text.pop();
        }
        Some(text)
    }

    /// Character offset of the start of `line` (clamped to the document end).
    pub fn line_to_char(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line)
    }

    /// Character offset of the end of `line`, before its line break.
    pub fn line_end_char(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }

        let start = self.rope.line_to_char(line);
        let slice = self.rope.line(line);
        let mut len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len -= 1;
        }
        if len > 0 && slice.char(len - 1) == '\r' {
            len -= 1;
        }
        start + len
    }

    /// Line containing a character offset (clamped to the document end).
    pub fn char_to_line(&self, offset: usize) -> usize {
        self.rope.char_to_line(offset.min(self.rope.len_chars()))
    }

    /// Text of the half-open character range `start..end` (clamped).
    pub fn slice(&self, start: usize, end: usize) -> String {
        let len = self.rope.len_chars();
        let end = end.min(len);
        let start = start.min(end);
        self.rope.slice(start..end).to_string()
    }

    /// Apply a single edit in place.
    pub fn apply_edit(&mut self, edit: &TextDeltaEdit) -> Result<(), FoldError> {
        let len = self.rope.len_chars();
        let end = edit.end();
        if edit.start > len || end > len {
            return Err(FoldError::InvalidEdit {
                start: edit.start,
                end,
                len,
            });
        }

        if edit.deleted_len > 0 {
            self.rope.remove(edit.start..end);
        }
        if !edit.inserted_text.is_empty() {
            self.rope.insert(edit.start, &edit.inserted_text);
        }
        Ok(())
    }

    /// Apply every edit of `delta` in order, producing the post-change document.
    ///
    /// The receiver is left untouched when any edit is out of range.
    pub fn apply_delta(&self, delta: &TextDelta) -> Result<Document, FoldError> {
        let mut next = self.clone();
        for edit in &delta.edits {
            next.apply_edit(edit)?;
        }
        Ok(next)
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}
