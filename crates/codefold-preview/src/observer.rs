//! Insertion observer
//!
//! The host renders preview content incrementally. It reports each inserted subtree together
//! with the chain of nodes above it, nearest first. A subtree is processed when any node of that
//! chain is observed, so observing a container covers insertions at any depth below it.

use crate::element::PreviewElement;
use crate::processor::PreviewProcessor;
use std::collections::BTreeSet;
use tracing::trace;

/// Host-assigned identity of a preview node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

/// Watches preview nodes for inserted subtrees.
#[derive(Debug, Clone)]
pub struct PreviewObserver {
    processor: PreviewProcessor,
    observed: BTreeSet<NodeId>,
}

impl PreviewObserver {
    /// Create an observer that processes insertions with `processor`.
    pub fn new(processor: PreviewProcessor) -> Self {
        Self {
            processor,
            observed: BTreeSet::new(),
        }
    }

    /// The processor used for insertions.
    pub fn processor(&self) -> &PreviewProcessor {
        &self.processor
    }

    /// Start observing `node`. Returns `false` if it was already observed.
    pub fn observe(&mut self, node: NodeId) -> bool {
        self.observed.insert(node)
    }

    /// Stop observing `node`. Returns `false` if it was not observed.
    pub fn unobserve(&mut self, node: NodeId) -> bool {
        self.observed.remove(&node)
    }

    /// Check if `node` is observed.
    pub fn is_observing(&self, node: NodeId) -> bool {
        self.observed.contains(&node)
    }

    /// Stop observing everything.
    pub fn disconnect(&mut self) {
        self.observed.clear();
    }

    /// Handle a subtree inserted below `ancestors` (the parent first, then its parent, and so
    /// on). Returns the number of blocks processed.
    pub fn on_inserted(&self, ancestors: &[NodeId], subtree: &mut PreviewElement) -> usize {
        if !ancestors.iter().any(|node| self.is_observing(*node)) {
            trace!(parent = ?ancestors.first(), "insertion outside observed subtrees ignored");
            return 0;
        }
        self.processor.process_subtree(subtree)
    }
}
