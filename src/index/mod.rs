//! Workspace index: declaration records, immutable snapshots, and the
//! rebuild machinery (busy-flag guarded builder plus change debouncing).
//!
//! ## Snapshot discipline
//!
//! A [`WorkspaceIndex`] is built in one pass over every document and then
//! never mutated; consumers hold an `Arc` to whichever snapshot was current
//! when they asked. The [`IndexBuilder`] swaps the live snapshot wholesale,
//! so readers observe either the prior complete index or the new one, never
//! a torn intermediate state.

mod builder;
mod debounce;
mod declarations;
mod snapshot;

pub use builder::{IndexBuilder, RebuildOutcome};
pub use debounce::{DEBOUNCE_DELAY, Debouncer};
pub use declarations::{FragmentDecl, OperatorDecl, StructDecl};
pub use snapshot::WorkspaceIndex;
