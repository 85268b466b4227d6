//! Definition resolution through the tier list, and filesystem-backed
//! end-to-end flows.

use std::sync::Arc;

use flowdex::base::{DocumentId, Position};
use flowdex::project::{BufferSink, FsDocumentStore, MemoryDocumentStore, WorkspaceSession};

#[test]
fn test_live_scan_tier_when_index_has_no_struct() {
    // No external tooling installed, and the struct file appears after the
    // rebuild, so the snapshot lacks it. The live-scan tier still finds it.
    let store = MemoryDocumentStore::new();
    store.insert(
        "main.flow",
        r#"register("biz") { op("late.go", "LateOp", "late_op", 4); }"#,
    );

    let session = WorkspaceSession::new(store, Arc::new(BufferSink::new()));
    assert!(session.rebuild().success);
    assert!(session.snapshot().struct_decl("LateOp").is_none());

    session
        .store()
        .insert("biz/late.go", "package biz\ntype LateOp struct {}\n");

    // Cursor on the "LateOp" struct-name argument.
    let id = DocumentId::new("main.flow");
    let target = session.goto_definition(&id, Position::new(0, 35)).unwrap();
    assert_eq!(target.document.as_str(), "biz/late.go");
    assert_eq!(target.span.start.line, 1);
}

#[test]
fn test_no_definition_is_absence_not_error() {
    let store = MemoryDocumentStore::new();
    store.insert("main.flow", "main { nothing_here(); }\n");
    let session = WorkspaceSession::new(store, Arc::new(BufferSink::new()));
    session.rebuild();

    let id = DocumentId::new("main.flow");
    // On the unresolvable call.
    assert!(session.goto_definition(&id, Position::new(0, 9)).is_none());
    // On whitespace: classification fails, same quiet answer.
    assert!(session.goto_definition(&id, Position::new(0, 5)).is_none());
    // Unreadable document: same.
    assert!(
        session
            .goto_definition(&DocumentId::new("gone.flow"), Position::new(0, 0))
            .is_none()
    );
}

#[test]
fn test_fragment_expansion_resolves_to_definition() {
    let store = MemoryDocumentStore::new();
    store.insert("main.flow", "main { expand(\"prelude\"); }\n");
    store.insert("lib.flow", "fragment(\"prelude\") {\n    wait;\n}\n");

    let session = WorkspaceSession::new(store, Arc::new(BufferSink::new()));
    session.rebuild();

    let id = DocumentId::new("main.flow");
    let target = session.goto_definition(&id, Position::new(0, 16)).unwrap();
    assert_eq!(target.document.as_str(), "lib.flow");
    assert_eq!(target.span.start.line, 0);
}

#[test]
fn test_fs_store_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let flows = dir.path().join("flows");
    let ops = dir.path().join("biz").join("ops");
    std::fs::create_dir_all(&flows).unwrap();
    std::fs::create_dir_all(&ops).unwrap();

    std::fs::write(
        flows.join("main.flow"),
        r#"
register("biz/ops") {
    op("risk.go", "RiskOp", "risk_check", 10);
}
main { risk_check(); }
"#,
    )
    .unwrap();
    std::fs::write(ops.join("risk.go"), "package ops\n\ntype RiskOp struct {}\n").unwrap();

    // Sanity-check the fixture layout matches what the store should see.
    let on_disk = walkdir::WalkDir::new(dir.path())
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .count();
    assert_eq!(on_disk, 2);

    let session = WorkspaceSession::new(
        FsDocumentStore::new(dir.path()),
        Arc::new(BufferSink::new()),
    );
    let outcome = session.rebuild();
    assert!(outcome.success, "rebuild errors: {:?}", outcome.errors);
    assert_eq!(outcome.operator_count, 1);
    assert_eq!(outcome.struct_count, 1);

    let id = DocumentId::new("flows/main.flow");
    assert!(session.check_document(&id).is_empty());

    let target = session.goto_definition(&id, Position::new(4, 9)).unwrap();
    assert_eq!(target.document.as_str(), "biz/ops/risk.go");

    let hover = session.hover(&id, Position::new(4, 9)).unwrap();
    assert!(hover.contents.contains("operator risk_check"));
    assert!(hover.contents.contains("sequence 10"));
}
