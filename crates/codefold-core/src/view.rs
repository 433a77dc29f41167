//! Live-editing fold view
//!
//! [`FoldView`] owns everything the live-editing surface needs for one open document: the
//! document snapshot, the located blocks, the fold store, the initialization set, the deferred
//! request queue and the current decorations.
//!
//! # Reduction cycle
//!
//! Every change goes through one cycle:
//!
//! 1. the auto-expand guard inspects the proposed change and appends force-expand requests
//! 2. the change is applied to the document (rejected as a whole if an edit is out of range)
//! 3. the fold store remaps its entries and applies the requests
//! 4. blocks are located again and decorations are re-materialized
//! 5. the version is bumped and subscribers are notified
//!
//! Requests queued while rendering are flushed by [`FoldView::tick`], and always before the next
//! user transaction is committed.
//!
//! # Example
//!
//! ```rust
//! use codefold_core::{FoldCommand, FoldView, ViewConfiguration};
//!
//! let text = "```rust\nfn main() {}\n```\n";
//! let mut view = FoldView::new("notes.md", text, ViewConfiguration::default());
//! view.subscribe(|change| {
//!     println!("{:?}: {} -> {}", change.change_type, change.old_version, change.new_version);
//! });
//!
//! view.execute(FoldCommand::ToggleAtCursor { offset: 3 });
//! assert!(view.is_folded(view.spans()[0]));
//! ```

use crate::commands::{CommandResult, FoldCommand};
use crate::config::ViewConfiguration;
use crate::decorations::{Decoration, DecorationLayerId};
use crate::delta::TextDelta;
use crate::document::Document;
use crate::error::FoldError;
use crate::guard::expand_touched_folds;
use crate::initialization::{DocumentId, InitializationSet};
use crate::intervals::{CodeBlockSpan, FoldStore};
use crate::locator::{CodeBlock, locate_blocks};
use crate::protocol::{ToggleRequest, Transaction};
use crate::render::RenderPass;
use crate::resolver::DefaultStateResolver;
use crate::scheduler::RequestQueue;
use crate::syntax::{FenceClassifier, MarkdownFenceClassifier};
use std::ops::Range;
use std::sync::Arc;
use tracing::debug;

/// Document state
#[derive(Debug, Clone)]
pub struct DocumentState {
    /// Document identity
    pub id: DocumentId,
    /// Total line count
    pub line_count: usize,
    /// Total character count
    pub char_count: usize,
    /// View version number
    pub version: u64,
}

/// Fold state of one located block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldEntry {
    /// Block span.
    pub span: CodeBlockSpan,
    /// Whether the block is folded.
    pub folded: bool,
}

/// Folding state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldingState {
    /// Every located block, in document order
    pub entries: Vec<FoldEntry>,
    /// Count of folded blocks
    pub folded_count: usize,
    /// Deferred requests not yet applied
    pub pending_requests: usize,
}

/// Decorations state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationsState {
    /// Layer the decorations belong to.
    pub layer: DecorationLayerId,
    /// Total number of decorations.
    pub decoration_count: usize,
    /// Number of collapsed-block replacements.
    pub collapsed_count: usize,
}

/// State change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChangeType {
    /// Document content modified
    DocumentModified,
    /// Fold state changed
    FoldingChanged,
    /// Decorations changed
    DecorationsChanged,
    /// A different document was opened in the view
    DocumentSwitched,
    /// View configuration replaced
    ConfigurationChanged,
    /// Default-state requests were queued; call [`FoldView::tick`] to apply them
    RequestsScheduled,
}

/// State change record
#[derive(Debug, Clone)]
pub struct StateChange {
    /// Change type
    pub change_type: StateChangeType,
    /// Old version number
    pub old_version: u64,
    /// New version number
    pub new_version: u64,
    /// Structured text delta for document changes (if available).
    pub text_delta: Option<Arc<TextDelta>>,
}

impl StateChange {
    /// Create a new state change record.
    pub fn new(change_type: StateChangeType, old_version: u64, new_version: u64) -> Self {
        Self {
            change_type,
            old_version,
            new_version,
            text_delta: None,
        }
    }

    /// Attach a structured text delta to this change record.
    pub fn with_text_delta(mut self, delta: Arc<TextDelta>) -> Self {
        self.text_delta = Some(delta);
        self
    }
}

/// State change callback function type
pub type StateChangeCallback = Box<dyn FnMut(&StateChange) + Send>;

/// Fold state owner for the live-editing surface of one document.
pub struct FoldView {
    document: Document,
    config: ViewConfiguration,
    classifier: Box<dyn FenceClassifier>,
    blocks: Vec<CodeBlock>,
    store: FoldStore,
    resolver: DefaultStateResolver,
    initialized: InitializationSet,
    deferred: RequestQueue,
    decorations: Vec<Decoration>,
    /// Visible character range; `None` renders every block.
    viewport: Option<Range<usize>>,
    version: u64,
    callbacks: Vec<StateChangeCallback>,
    last_text_delta: Option<Arc<TextDelta>>,
}

impl FoldView {
    /// Open `text` as document `id`, classifying fences with [`MarkdownFenceClassifier`].
    pub fn new(id: impl Into<DocumentId>, text: &str, config: ViewConfiguration) -> Self {
        Self::with_classifier(id, text, config, Box::new(MarkdownFenceClassifier))
    }

    /// Open `text` as document `id` with a host-provided fence classifier.
    pub fn with_classifier(
        id: impl Into<DocumentId>,
        text: &str,
        config: ViewConfiguration,
        classifier: Box<dyn FenceClassifier>,
    ) -> Self {
        let document = Document::from_text(text);
        let blocks = locate_blocks(&document, classifier.as_ref());
        let mut view = Self {
            resolver: DefaultStateResolver::new(text, &config),
            document,
            config,
            classifier,
            blocks,
            store: FoldStore::new(),
            initialized: InitializationSet::new(id.into()),
            deferred: RequestQueue::new(),
            decorations: Vec::new(),
            viewport: None,
            version: 0,
            callbacks: Vec::new(),
            last_text_delta: None,
        };
        view.render();
        view
    }

    /// Identity of the open document.
    pub fn document_id(&self) -> &DocumentId {
        self.initialized.document()
    }

    /// Current document snapshot.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Current document text.
    pub fn text(&self) -> String {
        self.document.text()
    }

    /// View configuration.
    pub fn config(&self) -> &ViewConfiguration {
        &self.config
    }

    /// Current version number.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Check if state has changed since a version
    pub fn has_changed_since(&self, version: u64) -> bool {
        self.version > version
    }

    /// Located blocks, in document order.
    pub fn blocks(&self) -> &[CodeBlock] {
        &self.blocks
    }

    /// Spans of the located blocks, in document order.
    pub fn spans(&self) -> Vec<CodeBlockSpan> {
        self.blocks.iter().map(|block| block.span).collect()
    }

    /// Fold store after the last cycle.
    pub fn store(&self) -> &FoldStore {
        &self.store
    }

    /// Whether `span` is folded.
    pub fn is_folded(&self, span: CodeBlockSpan) -> bool {
        self.store.is_folded(span)
    }

    /// Current decorations, in document order.
    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    /// Blocks whose default state has been resolved in this document-open lifetime.
    pub fn initialized(&self) -> &InitializationSet {
        &self.initialized
    }

    /// Number of deferred requests waiting for the next tick.
    pub fn pending_requests(&self) -> usize {
        self.deferred.len()
    }

    /// Get the structured text delta produced by the last document edit, if any.
    pub fn last_text_delta(&self) -> Option<&TextDelta> {
        self.last_text_delta.as_deref()
    }

    /// Get document state
    pub fn get_document_state(&self) -> DocumentState {
        DocumentState {
            id: self.document_id().clone(),
            line_count: self.document.line_count(),
            char_count: self.document.char_count(),
            version: self.version,
        }
    }

    /// Get folding state
    pub fn get_folding_state(&self) -> FoldingState {
        let entries: Vec<FoldEntry> = self
            .blocks
            .iter()
            .map(|block| FoldEntry {
                span: block.span,
                folded: self.store.is_folded(block.span),
            })
            .collect();

        FoldingState {
            folded_count: entries.iter().filter(|entry| entry.folded).count(),
            entries,
            pending_requests: self.deferred.len(),
        }
    }

    /// Get decorations state
    pub fn get_decorations_state(&self) -> DecorationsState {
        DecorationsState {
            layer: DecorationLayerId::CODE_BLOCK_FOLDS,
            decoration_count: self.decorations.len(),
            collapsed_count: self.decorations.iter().filter(|d| d.is_collapsed()).count(),
        }
    }

    /// Subscribe to state change notifications
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&StateChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Replace the open document. Fold state, the initialization set and deferred requests of the
    /// previous document are discarded.
    pub fn open_document(&mut self, id: impl Into<DocumentId>, text: &str) {
        let id = id.into();
        debug!(document = %id, "switching document");

        self.document = Document::from_text(text);
        self.blocks = locate_blocks(&self.document, self.classifier.as_ref());
        self.store = FoldStore::new();
        self.resolver = DefaultStateResolver::new(text, &self.config);
        self.initialized.reset(id);
        self.deferred.clear();
        self.last_text_delta = None;
        let decorations_changed = self.render();

        let old_version = self.bump_version();
        self.notify(StateChange::new(
            StateChangeType::DocumentSwitched,
            old_version,
            self.version,
        ));
        if decorations_changed {
            self.notify(StateChange::new(
                StateChangeType::DecorationsChanged,
                old_version,
                self.version,
            ));
        }
    }

    /// Replace the view configuration and rebuild every decoration. Fold state is kept.
    pub fn reconfigure(&mut self, config: ViewConfiguration) {
        if config == self.config {
            return;
        }

        self.resolver.reconfigure(&config);
        self.config = config;
        self.render();

        let old_version = self.bump_version();
        self.notify(StateChange::new(
            StateChangeType::ConfigurationChanged,
            old_version,
            self.version,
        ));
    }

    /// Restrict rendering to the character range `visible` (`None` renders everything).
    ///
    /// Blocks scrolled into view for the first time get their default state scheduled.
    pub fn set_viewport(&mut self, visible: Option<Range<usize>>) {
        self.viewport = visible;
        if self.render() {
            self.notify(StateChange::new(
                StateChangeType::DecorationsChanged,
                self.version,
                self.version,
            ));
        }
    }

    /// Queue `request` for the next tick.
    pub fn request(&mut self, request: ToggleRequest) {
        self.deferred.push(self.version, request);
    }

    /// Apply every deferred request in a request-only cycle. Returns `true` if fold state
    /// changed.
    pub fn tick(&mut self) -> bool {
        if self.deferred.is_empty() {
            return false;
        }

        let requests: Vec<ToggleRequest> = self
            .deferred
            .drain()
            .into_iter()
            .map(|queued| queued.request)
            .collect();
        self.run_cycle(Arc::new(TextDelta::new()), requests)
    }

    /// Flip the fold state of `span`. Returns `true` if fold state changed.
    pub fn toggle(&mut self, span: CodeBlockSpan) -> bool {
        self.apply_now(ToggleRequest::toggle(span))
    }

    /// Fold `span`. Returns `true` if fold state changed.
    pub fn collapse(&mut self, span: CodeBlockSpan) -> bool {
        self.apply_now(ToggleRequest::collapse(span))
    }

    /// Unfold `span`. Returns `true` if fold state changed.
    pub fn expand(&mut self, span: CodeBlockSpan) -> bool {
        self.apply_now(ToggleRequest::expand(span))
    }

    /// Apply the request carried by an activated decoration button.
    ///
    /// A decoration rendered before a deferred default was flushed may no longer match the
    /// block's state. The click then applies what the shown button stood for: a toggle button
    /// collapses, a collapsed block expands.
    pub fn activate(&mut self, decoration: &Decoration) -> bool {
        self.tick();

        let stale = self
            .decorations
            .iter()
            .find(|current| current.span == decoration.span)
            .is_some_and(|current| current.kind != decoration.kind);
        let request = if stale {
            debug!(
                start = decoration.span.start,
                kind = ?decoration.kind,
                "stale decoration activated"
            );
            if decoration.is_collapsed() {
                ToggleRequest::expand(decoration.span)
            } else {
                ToggleRequest::collapse(decoration.span)
            }
        } else {
            decoration.activate()
        };
        self.apply_now(request)
    }

    /// Execute a fold command.
    pub fn execute(&mut self, command: FoldCommand) -> CommandResult {
        // Defaults scheduled for the blocks the user is looking at apply first.
        self.tick();

        match command.to_request(&self.blocks) {
            Some(request) => {
                self.apply_now(request);
                CommandResult::Applied(request)
            }
            None => {
                debug!(?command, "no code block at cursor");
                CommandResult::NoRegion
            }
        }
    }

    /// Apply a document change.
    pub fn edit(&mut self, delta: TextDelta) -> Result<(), FoldError> {
        self.dispatch(Transaction::edit(delta))
    }

    /// Commit a transaction: a document change plus fold requests in post-change coordinates.
    ///
    /// Deferred requests are flushed first. On error nothing of the transaction is committed.
    pub fn dispatch(&mut self, transaction: Transaction) -> Result<(), FoldError> {
        self.tick();

        let Transaction { delta, requests } = transaction;
        let next_document = if delta.is_empty() {
            None
        } else {
            Some(self.document.apply_delta(&delta)?)
        };

        let mut requests = requests;
        requests.extend(expand_touched_folds(&self.store, &delta));

        if let Some(document) = next_document {
            self.document = document;
            self.blocks = locate_blocks(&self.document, self.classifier.as_ref());
            self.resolver.refresh(&self.document.text());
            self.initialized.remap(&delta);
            self.deferred.map_through(&delta);
        }

        self.run_cycle(Arc::new(delta), requests);
        Ok(())
    }

    fn apply_now(&mut self, request: ToggleRequest) -> bool {
        self.tick();
        self.run_cycle(Arc::new(TextDelta::new()), vec![request])
    }

    /// Reduce the store, re-render and notify. The document must already reflect `delta`.
    fn run_cycle(&mut self, delta: Arc<TextDelta>, requests: Vec<ToggleRequest>) -> bool {
        let document_changed = !delta.is_empty();

        // Spans shifted by the edit are the same folds; only drops and applied requests count.
        let mut remapped = self.store.clone();
        let dropped = remapped.remap(&delta);
        let next_store = remapped.reduce(&TextDelta::new(), &requests);
        let folding_changed = dropped > 0 || next_store != remapped;
        self.store = next_store;

        // Any state set explicitly counts as the block's resolved state.
        for request in &requests {
            let span = request.span();
            if self.blocks.iter().any(|block| block.span == span) {
                self.initialized.insert(span);
            }
        }

        let decorations_changed = self.render();
        if !(document_changed || folding_changed || decorations_changed) {
            return false;
        }

        let old_version = self.bump_version();
        debug!(
            version = self.version,
            requests = requests.len(),
            entries = self.store.len(),
            "reduction cycle committed"
        );

        if document_changed {
            self.last_text_delta = Some(delta.clone());
            self.notify(
                StateChange::new(StateChangeType::DocumentModified, old_version, self.version)
                    .with_text_delta(delta),
            );
        }
        if folding_changed {
            self.notify(StateChange::new(
                StateChangeType::FoldingChanged,
                old_version,
                self.version,
            ));
        }
        if decorations_changed {
            self.notify(StateChange::new(
                StateChangeType::DecorationsChanged,
                old_version,
                self.version,
            ));
        }
        folding_changed
    }

    /// Re-materialize decorations. Returns `true` if they changed.
    fn render(&mut self) -> bool {
        let pending = self.deferred.len();
        let pass = RenderPass {
            document: &self.document,
            config: &self.config,
            store: &self.store,
            resolver: &self.resolver,
            version: self.version,
        };
        let decorations = pass.run(
            &self.blocks,
            self.viewport.clone(),
            &mut self.initialized,
            &mut self.deferred,
        );

        if self.deferred.len() > pending {
            self.notify(StateChange::new(
                StateChangeType::RequestsScheduled,
                self.version,
                self.version,
            ));
        }

        if decorations == self.decorations {
            return false;
        }
        self.decorations = decorations;
        true
    }

    fn bump_version(&mut self) -> u64 {
        let old_version = self.version;
        self.version += 1;
        old_version
    }

    /// Notify all callbacks
    fn notify(&mut self, change: StateChange) {
        for callback in &mut self.callbacks {
            callback(&change);
        }
    }
}

impl std::fmt::Debug for FoldView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FoldView")
            .field("document", &self.document_id())
            .field("version", &self.version)
            .field("blocks", &self.blocks.len())
            .field("folded", &self.store.len())
            .field("pending", &self.deferred.len())
            .finish_non_exhaustive()
    }
}
