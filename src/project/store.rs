//! Document storage collaborators.
//!
//! Documents are owned by the embedder (editor, language server, test
//! harness); the index only reads them. [`DocumentStore`] is the seam:
//! enumeration by kind plus text retrieval with modification metadata.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::base::{DocumentId, DocumentKind};

/// Failure to read from a document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(DocumentId),

    #[error("failed to read {document}: {source}")]
    Io {
        document: DocumentId,
        source: io::Error,
    },
}

/// A text snapshot of one document, plus its modification timestamp
/// when the store can provide one.
#[derive(Debug, Clone)]
pub struct DocumentText {
    pub text: Arc<str>,
    pub modified_at: Option<SystemTime>,
}

impl DocumentText {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self {
            text: text.into(),
            modified_at: None,
        }
    }
}

/// Read access to the workspace's documents.
pub trait DocumentStore: Send + Sync {
    /// All known documents of one kind, in stable order.
    fn documents(&self, kind: DocumentKind) -> Vec<DocumentId>;

    /// Fetch the current text snapshot of one document.
    fn read(&self, id: &DocumentId) -> Result<DocumentText, StoreError>;
}

// ============================================================================
// FILESYSTEM STORE
// ============================================================================

/// A [`DocumentStore`] backed by a directory tree.
///
/// Document ids are root-relative paths with `/` separators.
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collect_recursive(&self, dir: &Path, kind: DocumentKind, out: &mut Vec<DocumentId>) {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "failed to list directory");
                return;
            }
        };

        let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
        paths.sort();

        for path in paths {
            if path.is_dir() {
                self.collect_recursive(&path, kind, out);
            } else if let Some(name) = path.to_str()
                && DocumentKind::from_path(name) == Some(kind)
                && let Ok(rel) = path.strip_prefix(&self.root)
            {
                out.push(DocumentId::new(rel.to_string_lossy().replace('\\', "/")));
            }
        }
    }
}

impl DocumentStore for FsDocumentStore {
    fn documents(&self, kind: DocumentKind) -> Vec<DocumentId> {
        let mut out = Vec::new();
        self.collect_recursive(&self.root, kind, &mut out);
        out
    }

    fn read(&self, id: &DocumentId) -> Result<DocumentText, StoreError> {
        let path = self.root.join(id.as_str());
        let text = std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound(id.clone())
            } else {
                StoreError::Io {
                    document: id.clone(),
                    source,
                }
            }
        })?;
        let modified_at = std::fs::metadata(&path).and_then(|m| m.modified()).ok();
        Ok(DocumentText {
            text: Arc::from(text),
            modified_at,
        })
    }
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// An in-memory [`DocumentStore`] for tests and embedders that manage
/// document text themselves (e.g. editor buffers).
#[derive(Default)]
pub struct MemoryDocumentStore {
    docs: RwLock<FxHashMap<DocumentId, DocumentText>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document's text.
    pub fn insert(&self, id: impl Into<DocumentId>, text: impl Into<Arc<str>>) {
        let entry = DocumentText {
            text: text.into(),
            modified_at: Some(SystemTime::now()),
        };
        self.docs.write().insert(id.into(), entry);
    }

    /// Remove a document.
    pub fn remove(&self, id: &DocumentId) {
        self.docs.write().remove(id);
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn documents(&self, kind: DocumentKind) -> Vec<DocumentId> {
        let mut ids: Vec<DocumentId> = self
            .docs
            .read()
            .keys()
            .filter(|id| DocumentKind::from_path(id.as_str()) == Some(kind))
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    fn read(&self, id: &DocumentId) -> Result<DocumentText, StoreError> {
        self.docs
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryDocumentStore::new();
        store.insert("a/flow/main.flow", "main {}");
        store.insert("a/ops/risk.go", "package ops");

        assert_eq!(store.documents(DocumentKind::Dsl).len(), 1);
        assert_eq!(store.documents(DocumentKind::HostLang).len(), 1);

        let id = DocumentId::new("a/flow/main.flow");
        assert_eq!(&*store.read(&id).unwrap().text, "main {}");

        store.remove(&id);
        assert!(matches!(store.read(&id), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_fs_store_walks_tree() {
        let dir = tempfile::tempdir().unwrap();
        let ops = dir.path().join("ops");
        std::fs::create_dir(&ops).unwrap();
        std::fs::write(dir.path().join("main.flow"), "main {}").unwrap();
        std::fs::write(ops.join("risk.go"), "package ops").unwrap();
        std::fs::write(ops.join("notes.txt"), "ignored").unwrap();

        let store = FsDocumentStore::new(dir.path());
        let dsl = store.documents(DocumentKind::Dsl);
        assert_eq!(dsl.len(), 1);
        assert_eq!(dsl[0].as_str(), "main.flow");

        let host = store.documents(DocumentKind::HostLang);
        assert_eq!(host.len(), 1);
        assert_eq!(host[0].as_str(), "ops/risk.go");

        let text = store.read(&host[0]).unwrap();
        assert_eq!(&*text.text, "package ops");
        assert!(text.modified_at.is_some());
    }
}
