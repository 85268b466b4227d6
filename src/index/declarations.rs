//! Declaration records held by a workspace index snapshot.
//!
//! Declarations are created only during a rebuild and never mutated after.
//! An operator references its struct **by name only**; the link is resolved
//! by lookup at diagnostic/resolution time because the struct may not exist
//! or may change independently.

use std::time::SystemTime;

use smol_str::SmolStr;

use crate::base::{DocumentId, Span};
use crate::extract::{RawFragment, RawOperator, RawStruct};

/// An operator declared inside a registration block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorDecl {
    /// Invocation name (intended-unique workspace-wide).
    pub name: SmolStr,
    /// Name of the host-language struct backing this operator.
    pub struct_name: SmolStr,
    /// Package path of the enclosing registration block.
    pub package_path: SmolStr,
    /// Host file path relative to the package.
    pub relative_path: SmolStr,
    /// Sequence tag. 0 is the "absent/invalid" sentinel and is excluded
    /// from uniqueness checks.
    pub sequence: u32,
    pub document: DocumentId,
    /// Span of the whole `op(...)` entry.
    pub span: Span,
    /// Span of the struct-name argument.
    pub struct_name_span: Span,
    pub discovered_at: SystemTime,
}

impl OperatorDecl {
    pub(crate) fn from_raw(raw: RawOperator, document: DocumentId, now: SystemTime) -> Self {
        Self {
            name: raw.name,
            struct_name: raw.struct_name,
            package_path: raw.package_path,
            relative_path: raw.relative_path,
            sequence: raw.sequence,
            document,
            span: raw.span,
            struct_name_span: raw.struct_name_span,
            discovered_at: now,
        }
    }
}

/// A reusable fragment definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentDecl {
    pub name: SmolStr,
    pub document: DocumentId,
    /// Span of the whole fragment block.
    pub span: Span,
    /// Span of the name argument.
    pub name_span: Span,
}

impl FragmentDecl {
    pub(crate) fn from_raw(raw: RawFragment, document: DocumentId) -> Self {
        Self {
            name: raw.name,
            document,
            span: raw.span,
            name_span: raw.name_span,
        }
    }
}

/// A struct declaration in a host-language file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    pub name: SmolStr,
    /// Package marker, or the enclosing directory for the entry package.
    pub package_path: SmolStr,
    pub document: DocumentId,
    /// Span of the struct name in the `type` header.
    pub span: Span,
    /// Last-modified timestamp reported by the store, for staleness checks.
    pub modified_at: Option<SystemTime>,
}

impl StructDecl {
    pub(crate) fn from_raw(
        raw: RawStruct,
        package_path: SmolStr,
        document: DocumentId,
        modified_at: Option<SystemTime>,
    ) -> Self {
        Self {
            name: raw.name,
            package_path,
            document,
            span: raw.span,
            modified_at,
        }
    }
}
