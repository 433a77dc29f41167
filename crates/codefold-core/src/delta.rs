//! Structured text change deltas and position mapping.
//!
//! A [`TextDelta`] describes one document change as an ordered list of edits expressed in
//! **character offsets** (Unicode scalar values). Edits apply in order: the `start` of each edit
//! is an offset into the document produced by the edits before it.
//!
//! Mapping offsets through a delta is a pure transform. The fold store, the initialization set
//! and the deferred request queue all use it to carry spans across a change.

/// A single text edit expressed in character offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDeltaEdit {
    /// Start character offset of the edit.
    pub start: usize,
    /// Number of characters removed at `start`.
    pub deleted_len: usize,
    /// Text inserted at `start` (may be empty).
    pub inserted_text: String,
}

impl TextDeltaEdit {
    /// Insert `text` at `offset`.
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            start: offset,
            deleted_len: 0,
            inserted_text: text.into(),
        }
    }

    /// Delete the half-open range `start..end`.
    pub fn delete(start: usize, end: usize) -> Self {
        Self {
            start,
            deleted_len: end.saturating_sub(start),
            inserted_text: String::new(),
        }
    }

    /// Replace the half-open range `start..end` with `text`.
    pub fn replace(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            deleted_len: end.saturating_sub(start),
            inserted_text: text.into(),
        }
    }

    /// Length of `inserted_text` in characters.
    pub fn inserted_len(&self) -> usize {
        self.inserted_text.chars().count()
    }

    /// Exclusive end of the deleted range, in the coordinates this edit applies to.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.deleted_len)
    }

    /// Returns `true` if the edit neither deletes nor inserts anything.
    pub fn is_noop(&self) -> bool {
        self.deleted_len == 0 && self.inserted_text.is_empty()
    }

    /// Map a position through this edit.
    ///
    /// Positions before the edit are unchanged and positions after the deleted range shift by the
    /// length difference. A position exactly at a pure insertion point follows `assoc`. A position
    /// at the start of a deleted range stays put; one at its end lands after the inserted text;
    /// one strictly inside collapses to whichever side of the inserted text `assoc` selects.
    pub fn map_pos(&self, pos: usize, assoc: Assoc) -> usize {
        let end = self.end();
        let inserted = self.inserted_len();

        if pos < self.start {
            pos
        } else if pos > end {
            pos - self.deleted_len + inserted
        } else if self.deleted_len == 0 {
            match assoc {
                Assoc::Before => pos,
                Assoc::After => pos + inserted,
            }
        } else if pos == self.start {
            pos
        } else if pos == end {
            self.start + inserted
        } else {
            match assoc {
                Assoc::Before => self.start,
                Assoc::After => self.start + inserted,
            }
        }
    }
}

/// Which side of inserted text a mapped position sticks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    /// Stay before text inserted at the position.
    Before,
    /// Move past text inserted at the position.
    After,
}

/// A structured description of a document text change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextDelta {
    /// Ordered list of edits that transforms the "before" document into the "after" document.
    pub edits: Vec<TextDeltaEdit>,
}

impl TextDelta {
    /// An empty delta (no document change).
    pub fn new() -> Self {
        Self { edits: Vec::new() }
    }

    /// A delta made of a single edit.
    pub fn single(edit: TextDeltaEdit) -> Self {
        Self { edits: vec![edit] }
    }

    /// A delta from an ordered list of edits.
    pub fn from_edits(edits: Vec<TextDeltaEdit>) -> Self {
        Self { edits }
    }

    /// Append an edit (builder style).
    pub fn with_edit(mut self, edit: TextDeltaEdit) -> Self {
        self.edits.push(edit);
        self
    }

    /// Returns `true` if this delta changes nothing.
    pub fn is_empty(&self) -> bool {
        self.edits.iter().all(TextDeltaEdit::is_noop)
    }

    /// Map a position through every edit in order.
    pub fn map_pos(&self, pos: usize, assoc: Assoc) -> usize {
        self.edits
            .iter()
            .fold(pos, |pos, edit| edit.map_pos(pos, assoc))
    }

    /// Net change in document length, in characters.
    pub fn len_change(&self) -> isize {
        self.edits
            .iter()
            .map(|e| e.inserted_len() as isize - e.deleted_len as isize)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_before_and_after_edit() {
        let edit = TextDeltaEdit::replace(10, 15, "ab");
        assert_eq!(edit.map_pos(3, Assoc::After), 3);
        assert_eq!(edit.map_pos(20, Assoc::Before), 17);
    }

    #[test]
    fn test_map_pure_insertion_point() {
        let edit = TextDeltaEdit::insert(5, "xyz");
        assert_eq!(edit.map_pos(5, Assoc::Before), 5);
        assert_eq!(edit.map_pos(5, Assoc::After), 8);
    }

    #[test]
    fn test_map_positions_in_deleted_range() {
        let edit = TextDeltaEdit::replace(10, 20, "ab");
        assert_eq!(edit.map_pos(10, Assoc::After), 10);
        assert_eq!(edit.map_pos(20, Assoc::Before), 12);
        assert_eq!(edit.map_pos(15, Assoc::Before), 10);
        assert_eq!(edit.map_pos(15, Assoc::After), 12);
    }

    #[test]
    fn test_sequential_edits_compose() {
        // "hello world" -> insert "big " at 6 -> delete "hello " (0..6)
        let delta = TextDelta::new()
            .with_edit(TextDeltaEdit::insert(6, "big "))
            .with_edit(TextDeltaEdit::delete(0, 6));
        // 'w' was at 6; after the first edit it is at 10, after the second at 4.
        assert_eq!(delta.map_pos(6, Assoc::After), 4);
        assert_eq!(delta.len_change(), -2);
    }

    #[test]
    fn test_noop_delta_is_empty() {
        let delta = TextDelta::single(TextDeltaEdit::insert(3, ""));
        assert!(delta.is_empty());
        assert!(TextDelta::new().is_empty());
    }
}
