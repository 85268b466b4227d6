//! Rebuild orchestration.
//!
//! The builder owns the live snapshot slot and the busy flag. `rebuild` is
//! a full re-scan: every DSL and host document is re-read and re-extracted,
//! and the previous snapshot is replaced wholesale, which guarantees no
//! stale declaration survives a document deletion.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Instant, SystemTime};

use parking_lot::RwLock;

use crate::base::DocumentKind;
use crate::extract::{extract_dsl, extract_host, package_path_for};
use crate::project::DocumentStore;

use super::declarations::{FragmentDecl, OperatorDecl, StructDecl};
use super::snapshot::WorkspaceIndex;

/// Result record of one rebuild request.
#[derive(Debug, Clone)]
pub struct RebuildOutcome {
    pub success: bool,
    pub operator_count: usize,
    pub fragment_count: usize,
    pub struct_count: usize,
    pub duration_ms: u64,
    /// Per-document read failures (and the single "busy" rejection).
    /// Read failures do not abort the rebuild.
    pub errors: Vec<String>,
}

impl RebuildOutcome {
    fn busy() -> Self {
        Self {
            success: false,
            operator_count: 0,
            fragment_count: 0,
            struct_count: 0,
            duration_ms: 0,
            errors: vec!["rebuild already in progress".to_string()],
        }
    }
}

/// Owns the live [`WorkspaceIndex`] snapshot and serializes rebuilds.
///
/// At most one rebuild runs at a time; a request arriving while one is
/// active is rejected immediately, not queued. Snapshot reads are wait-free
/// with respect to rebuilds: readers clone the `Arc` out of the slot and
/// keep whatever snapshot was current when they asked.
pub struct IndexBuilder {
    snapshot: RwLock<Arc<WorkspaceIndex>>,
    busy: AtomicBool,
    version: AtomicU64,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(WorkspaceIndex::empty())),
            busy: AtomicBool::new(false),
            version: AtomicU64::new(0),
        }
    }

    /// The current snapshot. May be up to one debounce interval stale.
    pub fn snapshot(&self) -> Arc<WorkspaceIndex> {
        self.snapshot.read().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Re-scan the whole workspace and swap in a fresh snapshot.
    ///
    /// Returns a busy rejection (`success == false`, one error entry, no
    /// snapshot change) when a rebuild is already active.
    pub fn rebuild(&self, store: &dyn DocumentStore) -> RebuildOutcome {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("rebuild rejected: already in progress");
            return RebuildOutcome::busy();
        }

        let outcome = self.rebuild_inner(store);
        self.busy.store(false, Ordering::Release);
        outcome
    }

    fn rebuild_inner(&self, store: &dyn DocumentStore) -> RebuildOutcome {
        let started = Instant::now();
        let discovered_at = SystemTime::now();
        let mut errors = Vec::new();

        let mut operators: Vec<OperatorDecl> = Vec::new();
        let mut fragments: Vec<FragmentDecl> = Vec::new();
        for id in store.documents(DocumentKind::Dsl) {
            let doc = match store.read(&id) {
                Ok(doc) => doc,
                Err(e) => {
                    errors.push(e.to_string());
                    continue;
                }
            };
            let extraction = extract_dsl(&doc.text);
            operators.extend(
                extraction
                    .operators
                    .into_iter()
                    .map(|raw| OperatorDecl::from_raw(raw, id.clone(), discovered_at)),
            );
            fragments.extend(
                extraction
                    .fragments
                    .into_iter()
                    .map(|raw| FragmentDecl::from_raw(raw, id.clone())),
            );
        }

        let mut structs: Vec<StructDecl> = Vec::new();
        for id in store.documents(DocumentKind::HostLang) {
            let doc = match store.read(&id) {
                Ok(doc) => doc,
                Err(e) => {
                    errors.push(e.to_string());
                    continue;
                }
            };
            let extraction = extract_host(&doc.text);
            let package_path = package_path_for(&extraction, &id);
            structs.extend(extraction.structs.into_iter().map(|raw| {
                StructDecl::from_raw(raw, package_path.clone(), id.clone(), doc.modified_at)
            }));
        }

        let version = self.version.fetch_add(1, Ordering::AcqRel) + 1;
        let index = WorkspaceIndex::build(version, operators, fragments, structs);

        let outcome = RebuildOutcome {
            success: true,
            operator_count: index.operator_count(),
            fragment_count: index.fragment_count(),
            struct_count: index.struct_count(),
            duration_ms: started.elapsed().as_millis() as u64,
            errors,
        };

        // Atomic swap: readers see the prior snapshot or this one, whole.
        *self.snapshot.write() = Arc::new(index);

        tracing::info!(
            version,
            operators = outcome.operator_count,
            fragments = outcome.fragment_count,
            structs = outcome.struct_count,
            duration_ms = outcome.duration_ms,
            read_errors = outcome.errors.len(),
            "workspace index rebuilt"
        );
        outcome
    }
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}
