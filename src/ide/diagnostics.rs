//! Cross-reference diagnostics.
//!
//! Every check reads the whole workspace snapshot but emits diagnostics only
//! at locations inside the target document. The result replaces that
//! document's previous diagnostics wholesale, so nothing stale lingers after
//! a fix.

use std::fmt;
use std::sync::Arc;

use crate::base::{DocumentId, Span};
use crate::extract::extract_dsl;
use crate::index::{OperatorDecl, WorkspaceIndex};

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
        }
    }
}

/// The enumerated cross-reference checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    DuplicateName,
    DuplicateSequence,
    UnregisteredOperator,
    FragmentNotFound,
    StructNotFound,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::DuplicateName => "duplicate-name",
            DiagnosticCode::DuplicateSequence => "duplicate-sequence",
            DiagnosticCode::UnregisteredOperator => "unregistered-operator",
            DiagnosticCode::FragmentNotFound => "fragment-not-found",
            DiagnosticCode::StructNotFound => "struct-not-found",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub document: DocumentId,
    pub span: Span,
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: Arc<str>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(
        document: DocumentId,
        span: Span,
        code: DiagnosticCode,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            document,
            span,
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }
}

/// Compute all diagnostics for one document against the current snapshot.
///
/// `text` is the document's current text; declaration-level checks use the
/// snapshot's view of the document (which may be up to one debounce interval
/// behind), reference-level checks use the live text.
pub fn check_document(
    index: &WorkspaceIndex,
    document: &DocumentId,
    text: &str,
) -> Vec<Diagnostic> {
    let mut out = Vec::new();

    check_duplicate_names(index, document, &mut out);
    check_duplicate_sequences(index, document, &mut out);
    check_references(index, document, text, &mut out);
    check_missing_structs(index, document, &mut out);

    out
}

/// One conflicting declaration, rendered as `file (package)` for messages.
fn describe(op: &OperatorDecl) -> String {
    format!("{} ({})", op.document, op.package_path)
}

fn conflict_list(group: &[&OperatorDecl]) -> String {
    group
        .iter()
        .map(|op| describe(op))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Duplicate operator names, grouped workspace-wide; one error per
/// declaration physically present in the target document.
fn check_duplicate_names(index: &WorkspaceIndex, document: &DocumentId, out: &mut Vec<Diagnostic>) {
    for (name, group) in index.operators_by_name() {
        if group.len() < 2 {
            continue;
        }
        let conflicts = conflict_list(&group);
        for op in group.iter().filter(|op| op.document == *document) {
            out.push(Diagnostic::error(
                document.clone(),
                op.span,
                DiagnosticCode::DuplicateName,
                format!("duplicate operator name '{name}': declared in {conflicts}"),
            ));
        }
    }
}

/// Duplicate sequence values, excluding the 0 sentinel.
///
/// Uniqueness is enforced workspace-wide, matching the observed behavior of
/// the checks rather than the per-block wording of the user documentation.
fn check_duplicate_sequences(
    index: &WorkspaceIndex,
    document: &DocumentId,
    out: &mut Vec<Diagnostic>,
) {
    for (sequence, group) in index.operators_by_sequence() {
        if group.len() < 2 {
            continue;
        }
        let conflicts = conflict_list(&group);
        for op in group.iter().filter(|op| op.document == *document) {
            out.push(Diagnostic::error(
                document.clone(),
                op.span,
                DiagnosticCode::DuplicateSequence,
                format!(
                    "duplicate sequence {sequence} for '{}': used in {conflicts}",
                    op.name
                ),
            ));
        }
    }
}

/// Unregistered operator calls and dangling fragment expansions, scanned
/// from the live text. Call sites inside registration-block extents are
/// already excluded by the extractor's brace-balanced scan.
fn check_references(
    index: &WorkspaceIndex,
    document: &DocumentId,
    text: &str,
    out: &mut Vec<Diagnostic>,
) {
    let extraction = extract_dsl(text);

    for call in &extraction.calls {
        if index.operator(&call.name).is_none() {
            out.push(Diagnostic::error(
                document.clone(),
                call.span,
                DiagnosticCode::UnregisteredOperator,
                format!("'{}' is not registered as an operator", call.name),
            ));
        }
    }

    for expansion in &extraction.expansions {
        if index.fragment(&expansion.name).is_none() {
            out.push(Diagnostic::error(
                document.clone(),
                expansion.span,
                DiagnosticCode::FragmentNotFound,
                format!(
                    "fragment '{}' is not defined anywhere in the workspace",
                    expansion.name
                ),
            ));
        }
    }
}

/// Operators declared in the target document whose struct has no matching
/// declaration in the index.
fn check_missing_structs(index: &WorkspaceIndex, document: &DocumentId, out: &mut Vec<Diagnostic>) {
    for op in index.operators() {
        if op.document != *document {
            continue;
        }
        if index.struct_decl(&op.struct_name).is_none() {
            out.push(Diagnostic::error(
                document.clone(),
                op.span,
                DiagnosticCode::StructNotFound,
                format!(
                    "struct '{}' for operator '{}' not found (expected under '{}')",
                    op.struct_name, op.name, op.package_path
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexBuilder;
    use crate::project::{DocumentStore, MemoryDocumentStore};

    fn build(store: &MemoryDocumentStore) -> Arc<WorkspaceIndex> {
        let builder = IndexBuilder::new();
        assert!(builder.rebuild(store).success);
        builder.snapshot()
    }

    fn check(store: &MemoryDocumentStore, index: &WorkspaceIndex, doc: &str) -> Vec<Diagnostic> {
        let id = DocumentId::new(doc);
        let text = store.read(&id).unwrap().text;
        check_document(index, &id, &text)
    }

    #[test]
    fn test_clean_workspace_has_no_diagnostics() {
        let store = MemoryDocumentStore::new();
        store.insert(
            "main.flow",
            r#"
register("biz/ops") { op("risk.go", "RiskOp", "risk_check", 1); }
main { risk_check(); }
"#,
        );
        store.insert("ops/risk.go", "package ops\ntype RiskOp struct {}\n");

        let index = build(&store);
        assert!(check(&store, &index, "main.flow").is_empty());
    }

    #[test]
    fn test_duplicate_name_and_sequence_across_documents() {
        let store = MemoryDocumentStore::new();
        store.insert("a.flow", r#"register("pkg/a") { op("a.go", "A1", "a1", 2); }"#);
        store.insert("b.flow", r#"register("pkg/b") { op("b.go", "B1", "a1", 2); }"#);
        store.insert("x/a.go", "package a\ntype A1 struct {}\n");
        store.insert("x/b.go", "package b\ntype B1 struct {}\n");

        let index = build(&store);

        for doc in ["a.flow", "b.flow"] {
            let diags = check(&store, &index, doc);
            let codes: Vec<DiagnosticCode> = diags.iter().map(|d| d.code).collect();
            assert_eq!(
                codes,
                vec![
                    DiagnosticCode::DuplicateName,
                    DiagnosticCode::DuplicateSequence
                ],
                "wrong codes for {doc}: {diags:?}"
            );
            // Each message names both conflicting documents.
            for diag in &diags {
                assert!(diag.message.contains("a.flow (pkg/a)"), "{}", diag.message);
                assert!(diag.message.contains("b.flow (pkg/b)"), "{}", diag.message);
                assert_eq!(diag.document.as_str(), doc);
            }
        }
    }

    #[test]
    fn test_duplicate_diagnostics_only_in_owning_documents() {
        let store = MemoryDocumentStore::new();
        store.insert("a.flow", r#"register("p") { op("a.go", "A1", "dup", 1); }"#);
        store.insert("b.flow", r#"register("p") { op("b.go", "B1", "dup", 3); }"#);
        store.insert("c.flow", r#"register("p") { op("c.go", "C1", "only", 5); }"#);
        store.insert(
            "p/a.go",
            "package p\ntype A1 struct {}\ntype B1 struct {}\ntype C1 struct {}\n",
        );

        let index = build(&store);
        assert_eq!(check(&store, &index, "a.flow").len(), 1);
        assert_eq!(check(&store, &index, "b.flow").len(), 1);
        assert!(check(&store, &index, "c.flow").is_empty());
    }

    #[test]
    fn test_sequence_zero_never_conflicts() {
        let store = MemoryDocumentStore::new();
        store.insert("a.flow", r#"register("p") { op("a.go", "A1", 0); }"#);
        store.insert("b.flow", r#"register("p") { op("b.go", "B1", 0); }"#);
        store.insert("p/a.go", "package p\ntype A1 struct {}\ntype B1 struct {}\n");

        let index = build(&store);
        assert!(check(&store, &index, "a.flow").is_empty());
        assert!(check(&store, &index, "b.flow").is_empty());
    }

    #[test]
    fn test_unregistered_operator_call() {
        let store = MemoryDocumentStore::new();
        store.insert("c.flow", "main { mystery_op(); }\n");

        let index = build(&store);
        let diags = check(&store, &index, "c.flow");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::UnregisteredOperator);
        assert_eq!(diags[0].span.start.line, 0);
        assert_eq!(diags[0].span.start.column, 7);
    }

    #[test]
    fn test_calls_inside_registration_blocks_ignored() {
        let store = MemoryDocumentStore::new();
        store.insert("a.flow", r#"register("p") { op("a.go", "A1", 1); }"#);
        store.insert("p/a.go", "package p\ntype A1 struct {}\n");

        let index = build(&store);
        let diags = check(&store, &index, "a.flow");
        assert!(
            diags
                .iter()
                .all(|d| d.code != DiagnosticCode::UnregisteredOperator)
        );
    }

    #[test]
    fn test_dangling_fragment_reference() {
        let store = MemoryDocumentStore::new();
        store.insert("a.flow", "main { expand(\"missing\"); }\n");

        let index = build(&store);
        let diags = check(&store, &index, "a.flow");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::FragmentNotFound);

        // Defining the fragment and rebuilding clears it.
        store.insert("b.flow", "fragment(\"missing\") { }\n");
        let index = build(&store);
        assert!(check(&store, &index, "a.flow").is_empty());
    }

    #[test]
    fn test_missing_struct_for_operator() {
        let store = MemoryDocumentStore::new();
        store.insert("a.flow", r#"register("pkg") { op("gone.go", "GoneOp", 9); }"#);

        let index = build(&store);
        let diags = check(&store, &index, "a.flow");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::StructNotFound);
        assert!(diags[0].message.contains("GoneOp"));
    }

    #[test]
    fn test_severity_to_lsp() {
        assert_eq!(Severity::Error.to_lsp(), 1);
        assert_eq!(Severity::Warning.to_lsp(), 2);
    }
}
