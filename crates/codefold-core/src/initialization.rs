//! Per-document initialization set
//!
//! Records which blocks already had their default fold state applied during the current
//! document-open lifetime. Blocks are keyed by their start offset, which is carried across edits,
//! so typing at the end of a closing fence does not make a block look new.

use crate::delta::TextDelta;
use crate::intervals::CodeBlockSpan;
use std::collections::BTreeMap;
use std::fmt;

/// Opaque document identity (for example a vault-relative path).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a document id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identifier of one block within one document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId {
    /// Owning document.
    pub document: DocumentId,
    /// Current start offset of the block.
    pub start: usize,
}

/// Blocks of one document whose default state has been resolved.
#[derive(Debug, Clone)]
pub struct InitializationSet {
    document: DocumentId,
    /// start -> end, both remapped across edits
    blocks: BTreeMap<usize, usize>,
}

impl InitializationSet {
    /// An empty set for `document`.
    pub fn new(document: DocumentId) -> Self {
        Self {
            document,
            blocks: BTreeMap::new(),
        }
    }

    /// The document this set belongs to.
    pub fn document(&self) -> &DocumentId {
        &self.document
    }

    /// Mark `span` as initialized. Returns `true` if it was not already.
    pub fn insert(&mut self, span: CodeBlockSpan) -> bool {
        if self.blocks.contains_key(&span.start) {
            return false;
        }
        self.blocks.insert(span.start, span.end);
        true
    }

    /// Check if the block starting where `span` starts was already initialized.
    pub fn contains(&self, span: CodeBlockSpan) -> bool {
        self.blocks.contains_key(&span.start)
    }

    /// Carry recorded blocks across a document change. Blocks deleted by the change are forgotten.
    pub fn remap(&mut self, delta: &TextDelta) {
        if delta.is_empty() || self.blocks.is_empty() {
            return;
        }

        self.blocks = self
            .blocks
            .iter()
            .filter_map(|(&start, &end)| CodeBlockSpan::new(start, end).map_through(delta))
            .map(|span| (span.start, span.end))
            .collect();
    }

    /// Identifiers of every recorded block, in document order.
    pub fn ids(&self) -> Vec<BlockId> {
        self.blocks
            .keys()
            .map(|&start| BlockId {
                document: self.document.clone(),
                start,
            })
            .collect()
    }

    /// Number of recorded blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if no block has been initialized yet.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Forget every block and rebind the set to `document`.
    pub fn reset(&mut self, document: DocumentId) {
        self.document = document;
        self.blocks.clear();
    }
}
