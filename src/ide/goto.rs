//! Go-to-definition: context classification plus tiered resolution.
//!
//! Resolution is an ordered list of interchangeable strategies sharing one
//! capability: resolve a name to a location, or none. The first non-empty
//! result wins. An optional external host-language tooling integration is
//! simply omitted from the list when unavailable, never branched on inline.
//! If classification fails, or every tier fails, the result is `None` —
//! never an error.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::{DocumentId, DocumentKind, Position, Span};
use crate::extract::{extract_dsl, extract_host};
use crate::index::WorkspaceIndex;
use crate::project::DocumentStore;

/// A target location for go-to-definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GotoTarget {
    pub document: DocumentId,
    pub span: Span,
    pub name: SmolStr,
}

/// What the cursor sits on, and therefore what to search for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SymbolContext {
    /// The struct-name argument of an operator declaration.
    StructName(SmolStr),
    /// The name argument of a fragment-expansion directive.
    FragmentName(SmolStr),
    /// A bare operator-invocation token outside any registration block.
    OperatorCall(SmolStr),
}

/// The declaration kind a resolution request is after.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetKind {
    Struct,
    Fragment,
    Operator,
}

/// A name plus the declaration kind to search for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolveRequest {
    pub name: SmolStr,
    pub kind: TargetKind,
}

impl SymbolContext {
    pub fn to_request(&self) -> ResolveRequest {
        let (name, kind) = match self {
            SymbolContext::StructName(name) => (name, TargetKind::Struct),
            SymbolContext::FragmentName(name) => (name, TargetKind::Fragment),
            SymbolContext::OperatorCall(name) => (name, TargetKind::Operator),
        };
        ResolveRequest {
            name: name.clone(),
            kind,
        }
    }
}

/// Classify a cursor position inside a DSL document.
///
/// Returns `None` when the cursor is on nothing resolvable.
pub fn classify_position(text: &str, position: Position) -> Option<SymbolContext> {
    let extraction = extract_dsl(text);

    for op in &extraction.operators {
        if op.struct_name_span.contains(position) {
            return Some(SymbolContext::StructName(op.struct_name.clone()));
        }
    }
    for expansion in &extraction.expansions {
        if expansion.span.contains(position) {
            return Some(SymbolContext::FragmentName(expansion.name.clone()));
        }
    }
    for call in &extraction.calls {
        if call.span.contains(position) {
            return Some(SymbolContext::OperatorCall(call.name.clone()));
        }
    }
    None
}

/// One resolution tier.
pub trait ResolveStrategy {
    /// Strategy name, for tracing.
    fn name(&self) -> &'static str;

    /// Resolve a name to a declaration location, or none.
    fn resolve(&self, request: &ResolveRequest) -> Option<GotoTarget>;
}

/// Ordered strategy list; first non-empty result wins.
pub struct DefinitionResolver<'a> {
    strategies: Vec<&'a dyn ResolveStrategy>,
}

impl<'a> DefinitionResolver<'a> {
    pub fn new(strategies: Vec<&'a dyn ResolveStrategy>) -> Self {
        Self { strategies }
    }

    pub fn resolve(&self, request: &ResolveRequest) -> Option<GotoTarget> {
        for strategy in &self.strategies {
            if let Some(target) = strategy.resolve(request) {
                tracing::debug!(
                    strategy = strategy.name(),
                    name = %request.name,
                    "definition resolved"
                );
                return Some(target);
            }
        }
        None
    }
}

// ============================================================================
// INDEX TIER
// ============================================================================

/// Resolves against the current index snapshot. Fast; may be up to one
/// debounce interval stale.
pub struct IndexStrategy {
    snapshot: Arc<WorkspaceIndex>,
}

impl IndexStrategy {
    pub fn new(snapshot: Arc<WorkspaceIndex>) -> Self {
        Self { snapshot }
    }
}

impl ResolveStrategy for IndexStrategy {
    fn name(&self) -> &'static str {
        "index"
    }

    fn resolve(&self, request: &ResolveRequest) -> Option<GotoTarget> {
        match request.kind {
            TargetKind::Struct => self.snapshot.struct_decl(&request.name).map(|st| GotoTarget {
                document: st.document.clone(),
                span: st.span,
                name: st.name.clone(),
            }),
            TargetKind::Fragment => self.snapshot.fragment(&request.name).map(|frag| GotoTarget {
                document: frag.document.clone(),
                span: frag.name_span,
                name: frag.name.clone(),
            }),
            TargetKind::Operator => {
                let op = self.snapshot.operator(&request.name)?;
                // Prefer the backing struct; fall back to the declaration
                // entry when the struct is not indexed.
                if let Some(st) = self.snapshot.struct_decl(&op.struct_name) {
                    return Some(GotoTarget {
                        document: st.document.clone(),
                        span: st.span,
                        name: st.name.clone(),
                    });
                }
                Some(GotoTarget {
                    document: op.document.clone(),
                    span: op.span,
                    name: op.name.clone(),
                })
            }
        }
    }
}

// ============================================================================
// LIVE SCAN TIER
// ============================================================================

/// Re-reads host-language documents from the store and scans them for the
/// struct. Slow, but always current; the last resort when the snapshot is
/// stale or incomplete.
pub struct LiveScanStrategy<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> LiveScanStrategy<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    fn scan_for_struct(&self, name: &str) -> Option<GotoTarget> {
        for id in self.store.documents(DocumentKind::HostLang) {
            let doc = match self.store.read(&id) {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::debug!(document = %id, error = %e, "live scan skipped document");
                    continue;
                }
            };
            if let Some(decl) = extract_host(&doc.text)
                .structs
                .into_iter()
                .find(|s| s.name == name)
            {
                return Some(GotoTarget {
                    document: id,
                    span: decl.span,
                    name: decl.name,
                });
            }
        }
        None
    }
}

impl ResolveStrategy for LiveScanStrategy<'_> {
    fn name(&self) -> &'static str {
        "live-scan"
    }

    fn resolve(&self, request: &ResolveRequest) -> Option<GotoTarget> {
        match request.kind {
            TargetKind::Struct => self.scan_for_struct(&request.name),
            // The 3-argument declaration form names operators after their
            // structs, so a same-named struct is the best available answer.
            TargetKind::Operator => self.scan_for_struct(&request.name),
            TargetKind::Fragment => None,
        }
    }
}
