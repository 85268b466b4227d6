//! IDE features: cross-reference diagnostics, go-to-definition, hover.
//!
//! Everything here is a pure read of a [`crate::index::WorkspaceIndex`]
//! snapshot (plus the target document's text), so queries may run
//! concurrently with each other and with an in-flight rebuild.

mod diagnostics;
mod goto;
mod hover;

pub use diagnostics::{Diagnostic, DiagnosticCode, Severity, check_document};
pub use goto::{
    DefinitionResolver, GotoTarget, IndexStrategy, LiveScanStrategy, ResolveRequest,
    ResolveStrategy, SymbolContext, TargetKind, classify_position,
};
pub use hover::{HoverResult, hover};
