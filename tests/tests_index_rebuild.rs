//! Rebuild discipline: idempotence, busy rejection, failure aggregation.

use std::sync::Arc;
use std::time::Duration;

use flowdex::base::{DocumentId, DocumentKind};
use flowdex::index::IndexBuilder;
use flowdex::project::{DocumentStore, DocumentText, MemoryDocumentStore, StoreError};

fn fixture() -> MemoryDocumentStore {
    let store = MemoryDocumentStore::new();
    store.insert(
        "flows/main.flow",
        r#"
register("biz/ops") {
    op("risk.go", "RiskOp", "risk_check", 100);
    op("audit.go", "AuditOp", 200);
}
fragment("prelude") { risk_check(); }
main { expand("prelude"); AuditOp(); }
"#,
    );
    store.insert("biz/ops/risk.go", "package ops\ntype RiskOp struct {}\n");
    store.insert("biz/ops/audit.go", "package ops\ntype AuditOp struct {}\n");
    store
}

fn name_sets(index: &flowdex::index::WorkspaceIndex) -> (Vec<String>, Vec<String>, Vec<String>) {
    let mut ops: Vec<String> = index.operators().iter().map(|o| o.name.to_string()).collect();
    let mut frags: Vec<String> = index.fragments().iter().map(|f| f.name.to_string()).collect();
    let mut structs: Vec<String> = index.structs().iter().map(|s| s.name.to_string()).collect();
    ops.sort();
    frags.sort();
    structs.sort();
    (ops, frags, structs)
}

#[test]
fn test_rebuild_idempotent_without_changes() {
    let builder = IndexBuilder::new();
    let store = fixture();

    assert!(builder.rebuild(&store).success);
    let first = builder.snapshot();
    assert!(builder.rebuild(&store).success);
    let second = builder.snapshot();

    assert_eq!(name_sets(&first), name_sets(&second));
    assert_eq!(second.version(), first.version() + 1);
}

#[test]
fn test_rebuild_counts() {
    let builder = IndexBuilder::new();
    let outcome = builder.rebuild(&fixture());

    assert!(outcome.success);
    assert_eq!(outcome.operator_count, 2);
    assert_eq!(outcome.fragment_count, 1);
    assert_eq!(outcome.struct_count, 2);
    assert!(outcome.errors.is_empty());
}

/// A store whose DSL reads block long enough to overlap a second rebuild.
struct SlowStore {
    inner: MemoryDocumentStore,
    delay: Duration,
}

impl DocumentStore for SlowStore {
    fn documents(&self, kind: DocumentKind) -> Vec<DocumentId> {
        self.inner.documents(kind)
    }

    fn read(&self, id: &DocumentId) -> Result<DocumentText, StoreError> {
        std::thread::sleep(self.delay);
        self.inner.read(id)
    }
}

#[test]
fn test_concurrent_rebuild_rejected_with_single_error() {
    let store = Arc::new(SlowStore {
        inner: fixture(),
        delay: Duration::from_millis(100),
    });
    let builder = Arc::new(IndexBuilder::new());

    let bg_builder = builder.clone();
    let bg_store = store.clone();
    let handle = std::thread::spawn(move || bg_builder.rebuild(&*bg_store));

    // Give the background rebuild time to take the busy flag.
    std::thread::sleep(Duration::from_millis(30));
    assert!(builder.is_busy());

    let rejected = builder.rebuild(&*store);
    assert!(!rejected.success);
    assert_eq!(rejected.errors.len(), 1);

    // The snapshot stays untouched until the original rebuild completes.
    assert_eq!(builder.snapshot().version(), 0);

    let original = handle.join().expect("rebuild thread panicked");
    assert!(original.success);
    assert_eq!(builder.snapshot().version(), 1);
}

/// A store that fails to read one specific document.
struct FlakyStore {
    inner: MemoryDocumentStore,
    broken: DocumentId,
}

impl DocumentStore for FlakyStore {
    fn documents(&self, kind: DocumentKind) -> Vec<DocumentId> {
        let mut ids = self.inner.documents(kind);
        if DocumentKind::from_path(self.broken.as_str()) == Some(kind) {
            ids.push(self.broken.clone());
            ids.sort();
        }
        ids
    }

    fn read(&self, id: &DocumentId) -> Result<DocumentText, StoreError> {
        if *id == self.broken {
            return Err(StoreError::NotFound(id.clone()));
        }
        self.inner.read(id)
    }
}

#[test]
fn test_read_failure_collected_and_rebuild_continues() {
    let store = FlakyStore {
        inner: fixture(),
        broken: DocumentId::new("flows/broken.flow"),
    };
    let builder = IndexBuilder::new();

    let outcome = builder.rebuild(&store);
    assert!(outcome.success);
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].contains("flows/broken.flow"));
    // The readable documents were still indexed.
    assert_eq!(outcome.operator_count, 2);
    assert_eq!(outcome.struct_count, 2);
}
