//! Project management: document storage collaborators and workspace sessions.

mod session;
mod store;

pub use session::{BufferSink, DiagnosticSink, NullSink, WorkspaceSession};
pub use store::{DocumentStore, DocumentText, FsDocumentStore, MemoryDocumentStore, StoreError};
