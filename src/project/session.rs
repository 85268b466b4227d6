//! Workspace session: the explicit context object owning the index.
//!
//! One session per open workspace. The session owns the [`IndexBuilder`],
//! the change debouncer, the optional external resolver tier, and the
//! injected diagnostic sink; its lifetime is the workspace's open/close
//! lifecycle. Nothing here is a process-wide singleton.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::base::{DocumentId, Position};
use crate::ide::{
    Diagnostic, DefinitionResolver, GotoTarget, HoverResult, IndexStrategy, LiveScanStrategy,
    ResolveStrategy, check_document, classify_position, hover as hover_at,
};
use crate::index::{DEBOUNCE_DELAY, Debouncer, IndexBuilder, RebuildOutcome, WorkspaceIndex};

use super::store::DocumentStore;

/// Receives each document's diagnostics, wholesale, on every check.
pub trait DiagnosticSink: Send + Sync {
    fn publish(&self, document: &DocumentId, diagnostics: Vec<Diagnostic>);
}

/// Discards everything. For embedders that pull diagnostics instead.
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn publish(&self, _document: &DocumentId, _diagnostics: Vec<Diagnostic>) {}
}

/// Buffers the latest diagnostics per document. Useful in tests and for
/// embedders that render on their own schedule.
#[derive(Default)]
pub struct BufferSink {
    published: Mutex<FxHashMap<DocumentId, Vec<Diagnostic>>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently published diagnostics for a document.
    pub fn latest(&self, document: &DocumentId) -> Vec<Diagnostic> {
        self.published
            .lock()
            .get(document)
            .cloned()
            .unwrap_or_default()
    }
}

impl DiagnosticSink for BufferSink {
    fn publish(&self, document: &DocumentId, diagnostics: Vec<Diagnostic>) {
        self.published.lock().insert(document.clone(), diagnostics);
    }
}

/// An open workspace: index lifecycle, queries, and change scheduling.
pub struct WorkspaceSession<S: DocumentStore> {
    store: S,
    builder: IndexBuilder,
    debouncer: Mutex<Debouncer>,
    sink: Arc<dyn DiagnosticSink>,
    /// External host-language tooling tier; omitted from the resolver list
    /// when absent.
    external: Option<Arc<dyn ResolveStrategy + Send + Sync>>,
}

impl<S: DocumentStore> WorkspaceSession<S> {
    pub fn new(store: S, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            store,
            builder: IndexBuilder::new(),
            debouncer: Mutex::new(Debouncer::new(DEBOUNCE_DELAY)),
            sink,
            external: None,
        }
    }

    /// Override the debounce quiet period (tests, fast embedders).
    pub fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debouncer = Mutex::new(Debouncer::new(delay));
        self
    }

    /// Install the external tooling resolution tier.
    pub fn with_external_resolver(
        mut self,
        external: Arc<dyn ResolveStrategy + Send + Sync>,
    ) -> Self {
        self.external = Some(external);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The current index snapshot (may be up to one debounce interval stale).
    pub fn snapshot(&self) -> Arc<WorkspaceIndex> {
        self.builder.snapshot()
    }

    /// Rebuild now (manual refresh). Rejected with `success == false` while
    /// another rebuild is active.
    pub fn rebuild(&self) -> RebuildOutcome {
        self.builder.rebuild(&self.store)
    }

    /// Whether a rebuild is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.builder.is_busy()
    }

    // ==================== Change scheduling ====================

    /// Record a create/change/delete notification for later coalescing.
    pub fn notify_change(&self, document: DocumentId, now: Instant) {
        self.debouncer.lock().notify(document, now);
    }

    /// Drive the debounce clock from the host event loop.
    ///
    /// When the pending batch comes due this triggers one rebuild covering
    /// it. If a rebuild is already active at that moment the batch has
    /// already been drained, so the scheduled rebuild is dropped — trailing
    /// updates are lost until another change notification starts a new
    /// cycle.
    pub fn poll_debounce(&self, now: Instant) -> Option<RebuildOutcome> {
        let due = self.debouncer.lock().poll(now)?;
        tracing::debug!(documents = due.len(), "debounced rebuild triggered");
        Some(self.builder.rebuild(&self.store))
    }

    // ==================== Queries ====================

    /// Compute and publish diagnostics for one document.
    ///
    /// The published list replaces the document's previous diagnostics
    /// wholesale. A document that cannot be read publishes an empty list.
    pub fn check_document(&self, document: &DocumentId) -> Vec<Diagnostic> {
        let diagnostics = match self.store.read(document) {
            Ok(doc) => check_document(&self.snapshot(), document, &doc.text),
            Err(e) => {
                tracing::warn!(document = %document, error = %e, "check skipped: unreadable");
                Vec::new()
            }
        };
        self.sink.publish(document, diagnostics.clone());
        diagnostics
    }

    /// Resolve a cursor position to a declaration location.
    ///
    /// Tier order: external tooling (when installed), index snapshot, live
    /// host-file scan. `None` means "no definition", never an error.
    pub fn goto_definition(&self, document: &DocumentId, position: Position) -> Option<GotoTarget> {
        let doc = self.store.read(document).ok()?;
        let context = classify_position(&doc.text, position)?;
        let request = context.to_request();

        let index_tier = IndexStrategy::new(self.snapshot());
        let live_tier = LiveScanStrategy::new(&self.store);

        let mut strategies: Vec<&dyn ResolveStrategy> = Vec::with_capacity(3);
        if let Some(external) = self.external.as_deref() {
            strategies.push(external);
        }
        strategies.push(&index_tier);
        strategies.push(&live_tier);

        DefinitionResolver::new(strategies).resolve(&request)
    }

    /// Hover summary for a cursor position, from the index snapshot.
    pub fn hover(&self, document: &DocumentId, position: Position) -> Option<HoverResult> {
        let doc = self.store.read(document).ok()?;
        hover_at(&self.snapshot(), &doc.text, position)
    }
}
