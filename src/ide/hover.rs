//! Hover information.
//!
//! Hover answers from the index snapshot only — no live scan, no external
//! tooling — since a slightly stale summary is preferable to a slow one.

use crate::base::{Position, Span};
use crate::index::WorkspaceIndex;

use super::goto::{SymbolContext, classify_position};

/// Result of a hover request.
#[derive(Clone, Debug)]
pub struct HoverResult {
    /// The hover content (markdown).
    pub contents: String,
    /// Span of the hovered token.
    pub span: Span,
}

/// Hover information for a cursor position in a DSL document.
pub fn hover(
    index: &WorkspaceIndex,
    text: &str,
    position: Position,
) -> Option<HoverResult> {
    let context = classify_position(text, position)?;

    match &context {
        SymbolContext::StructName(name) => {
            let st = index.struct_decl(name)?;
            Some(HoverResult {
                contents: format!(
                    "```\ntype {} struct\n```\npackage `{}` · {}",
                    st.name, st.package_path, st.document
                ),
                span: span_of(text, position)?,
            })
        }
        SymbolContext::FragmentName(name) => {
            let frag = index.fragment(name)?;
            Some(HoverResult {
                contents: format!("```\nfragment {}\n```\ndefined in {}", frag.name, frag.document),
                span: span_of(text, position)?,
            })
        }
        SymbolContext::OperatorCall(name) => {
            let op = index.operator(name)?;
            Some(HoverResult {
                contents: format!(
                    "```\noperator {}\n```\nstruct `{}` · package `{}` · sequence {}\nregistered in {}",
                    op.name, op.struct_name, op.package_path, op.sequence, op.document
                ),
                span: span_of(text, position)?,
            })
        }
    }
}

/// The span of whatever token classification matched at `position`.
fn span_of(text: &str, position: Position) -> Option<Span> {
    let extraction = crate::extract::extract_dsl(text);
    extraction
        .operators
        .iter()
        .map(|op| op.struct_name_span)
        .chain(extraction.expansions.iter().map(|e| e.span))
        .chain(extraction.calls.iter().map(|c| c.span))
        .find(|span| span.contains(position))
}
