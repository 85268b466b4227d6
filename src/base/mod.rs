//! Foundation types for the flowdex toolchain.
//!
//! This module provides fundamental types used throughout the library:
//! - [`DocumentId`], [`DocumentKind`] - Document identity and classification
//! - [`Position`], [`Span`] - Line/column positions for declarations
//!
//! This module has NO dependencies on other flowdex modules.

mod document;
mod position;

pub use document::{DocumentId, DocumentKind};
pub use position::{Position, Span};
