//! Document identity and classification.
//!
//! A [`DocumentId`] is the workspace-relative path (or URI) of a source
//! document. Documents are owned by the storage collaborator; flowdex only
//! ever holds their identifiers and text snapshots.

use std::fmt;
use std::sync::Arc;

/// Identifier of a source document (workspace-relative path or URI).
///
/// Cheap to clone (`Arc<str>` underneath).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(Arc<str>);

impl DocumentId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The final path segment (file name), if any.
    pub fn file_name(&self) -> &str {
        self.0.rsplit(['/', '\\']).next().unwrap_or(&self.0)
    }

    /// The name of the enclosing directory, if any.
    ///
    /// Used as the package path fallback for host files in the entry package.
    pub fn parent_dir_name(&self) -> Option<&str> {
        let mut segments = self.0.rsplit(['/', '\\']);
        segments.next()?;
        segments.next().filter(|s| !s.is_empty())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// The two kinds of documents the index is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// An orchestration DSL document (`.flow`).
    Dsl,
    /// A companion host-language source file (`.go`).
    HostLang,
}

impl DocumentKind {
    /// Classify a path by extension. Returns `None` for anything else.
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = path.rsplit('.').next()?;
        match ext {
            "flow" => Some(Self::Dsl),
            "go" => Some(Self::HostLang),
            _ => None,
        }
    }
}
