//! # flowdex
//!
//! Core library for FlowScript workspace indexing, cross-file diagnostics,
//! and definition resolution.
//!
//! FlowScript is a small orchestration DSL: operators are registered against
//! host-language (Go-style) structs inside `register(...)` blocks, reusable
//! fragments are defined with `fragment(...)` and spliced with
//! `expand(...)`. flowdex indexes both the DSL documents and the companion
//! host codebase, and answers the questions an editor asks: "is this
//! workspace consistent?" and "where is this thing defined?"
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide       → diagnostics engine, goto-definition, hover
//!   ↓
//! index     → declarations, WorkspaceIndex snapshots, rebuild + debounce
//!   ↓
//! project   → DocumentStore collaborators, WorkspaceSession lifecycle
//!   ↓
//! extract   → logos lexer, DSL scanner, host-language scanner
//!   ↓
//! base      → primitives (DocumentId, Position, Span)
//! ```
//!
//! ## Consistency model
//!
//! The index is an immutable snapshot rebuilt wholesale: every rebuild
//! re-extracts every document and swaps the snapshot atomically. Queries are
//! pure reads of whichever snapshot was current when they started, so they
//! may be up to one debounce interval stale — never torn.

// ============================================================================
// MODULES (dependency order: base → extract → project → index → ide)
// ============================================================================

/// Foundation types: DocumentId, DocumentKind, Position, Span
pub mod base;

/// Extraction: logos lexer, DSL declaration scanner, host-language scanner
pub mod extract;

/// Project management: document stores, workspace sessions
pub mod project;

/// Workspace index: declarations, snapshots, rebuild machinery
pub mod index;

/// IDE features: diagnostics, goto-definition, hover
pub mod ide;

// Re-export commonly needed items
pub use extract::keywords;

// Re-export foundation types
pub use base::{DocumentId, DocumentKind, Position, Span};
