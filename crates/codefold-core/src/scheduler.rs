//! Deferred request queue
//!
//! Rendering never mutates fold state. Requests produced while rendering (default-state
//! application) are queued here and flushed on the next tick, or before the next user
//! transaction, whichever comes first.

use crate::delta::TextDelta;
use crate::protocol::ToggleRequest;
use tracing::trace;

/// A request queued against a document version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuedRequest {
    /// Version of the document the request was issued against.
    pub version: u64,
    /// The request, in the coordinates of the current document.
    pub request: ToggleRequest,
}

/// FIFO of deferred toggle requests.
#[derive(Debug, Clone, Default)]
pub struct RequestQueue {
    pending: Vec<QueuedRequest>,
}

impl RequestQueue {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `request`, issued against `version`.
    pub fn push(&mut self, version: u64, request: ToggleRequest) {
        self.pending.push(QueuedRequest { version, request });
    }

    /// Carry queued requests across a document change. Requests whose span no longer exists are
    /// dropped.
    pub fn map_through(&mut self, delta: &TextDelta) {
        if delta.is_empty() || self.pending.is_empty() {
            return;
        }

        let before = self.pending.len();
        self.pending.retain_mut(|queued| match queued.request.map_through(delta) {
            Some(request) => {
                queued.request = request;
                true
            }
            None => false,
        });

        let dropped = before - self.pending.len();
        if dropped > 0 {
            trace!(dropped, "deferred requests cancelled by edit");
        }
    }

    /// Take every queued request, oldest first.
    pub fn drain(&mut self) -> Vec<QueuedRequest> {
        std::mem::take(&mut self.pending)
    }

    /// Queued requests, oldest first.
    pub fn pending(&self) -> &[QueuedRequest] {
        &self.pending
    }

    /// Number of queued requests.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every queued request.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::TextDeltaEdit;
    use crate::intervals::CodeBlockSpan;

    #[test]
    fn test_fifo_drain() {
        let mut queue = RequestQueue::new();
        queue.push(1, ToggleRequest::collapse(CodeBlockSpan::new(0, 5)));
        queue.push(2, ToggleRequest::collapse(CodeBlockSpan::new(10, 15)));

        let drained = queue.drain();
        assert!(queue.is_empty());
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].version, 1);
        assert_eq!(drained[1].request.from, 10);
    }

    #[test]
    fn test_edits_remap_and_cancel() {
        let mut queue = RequestQueue::new();
        queue.push(1, ToggleRequest::collapse(CodeBlockSpan::new(0, 5)));
        queue.push(1, ToggleRequest::collapse(CodeBlockSpan::new(10, 15)));

        queue.map_through(&TextDelta::single(TextDeltaEdit::delete(0, 6)));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pending()[0].request.span(), CodeBlockSpan::new(4, 9));
    }
}
