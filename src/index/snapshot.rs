//! The immutable workspace index snapshot.

use std::time::SystemTime;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::declarations::{FragmentDecl, OperatorDecl, StructDecl};

/// The complete, versioned set of operator/fragment/struct declarations at
/// a point in time.
///
/// Immutable once built; replaced wholesale by the next successful rebuild,
/// never patched in place. Name lookups are O(1)-expected; when a name is
/// declared more than once, lookup returns the first declaration in document
/// order (duplicates are the diagnostics engine's business).
#[derive(Debug)]
pub struct WorkspaceIndex {
    version: u64,
    built_at: SystemTime,
    operators: Vec<OperatorDecl>,
    fragments: Vec<FragmentDecl>,
    structs: Vec<StructDecl>,
    operator_by_name: FxHashMap<SmolStr, usize>,
    fragment_by_name: FxHashMap<SmolStr, usize>,
    struct_by_name: FxHashMap<SmolStr, usize>,
}

impl WorkspaceIndex {
    /// The snapshot in effect before any rebuild has run.
    pub fn empty() -> Self {
        Self::build(0, Vec::new(), Vec::new(), Vec::new())
    }

    pub(crate) fn build(
        version: u64,
        operators: Vec<OperatorDecl>,
        fragments: Vec<FragmentDecl>,
        structs: Vec<StructDecl>,
    ) -> Self {
        let mut operator_by_name = FxHashMap::default();
        for (i, op) in operators.iter().enumerate() {
            operator_by_name.entry(op.name.clone()).or_insert(i);
        }
        let mut fragment_by_name = FxHashMap::default();
        for (i, frag) in fragments.iter().enumerate() {
            fragment_by_name.entry(frag.name.clone()).or_insert(i);
        }
        let mut struct_by_name = FxHashMap::default();
        for (i, st) in structs.iter().enumerate() {
            struct_by_name.entry(st.name.clone()).or_insert(i);
        }

        Self {
            version,
            built_at: SystemTime::now(),
            operators,
            fragments,
            structs,
            operator_by_name,
            fragment_by_name,
            struct_by_name,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn built_at(&self) -> SystemTime {
        self.built_at
    }

    // ==================== Name lookup ====================

    pub fn operator(&self, name: &str) -> Option<&OperatorDecl> {
        self.operator_by_name.get(name).map(|&i| &self.operators[i])
    }

    pub fn fragment(&self, name: &str) -> Option<&FragmentDecl> {
        self.fragment_by_name.get(name).map(|&i| &self.fragments[i])
    }

    pub fn struct_decl(&self, name: &str) -> Option<&StructDecl> {
        self.struct_by_name.get(name).map(|&i| &self.structs[i])
    }

    // ==================== List accessors ====================

    /// All operator declarations, in document order (defensive copy).
    pub fn operators(&self) -> Vec<OperatorDecl> {
        self.operators.clone()
    }

    /// All fragment definitions (defensive copy).
    pub fn fragments(&self) -> Vec<FragmentDecl> {
        self.fragments.clone()
    }

    /// All struct declarations (defensive copy).
    pub fn structs(&self) -> Vec<StructDecl> {
        self.structs.clone()
    }

    pub fn operator_count(&self) -> usize {
        self.operators.len()
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    pub fn struct_count(&self) -> usize {
        self.structs.len()
    }

    // ==================== Grouping (for diagnostics) ====================

    /// Operators grouped by invocation name, in first-seen order.
    pub fn operators_by_name(&self) -> IndexMap<SmolStr, Vec<&OperatorDecl>> {
        let mut groups: IndexMap<SmolStr, Vec<&OperatorDecl>> = IndexMap::new();
        for op in &self.operators {
            groups.entry(op.name.clone()).or_default().push(op);
        }
        groups
    }

    /// Operators grouped by sequence value, excluding the 0 sentinel.
    pub fn operators_by_sequence(&self) -> IndexMap<u32, Vec<&OperatorDecl>> {
        let mut groups: IndexMap<u32, Vec<&OperatorDecl>> = IndexMap::new();
        for op in &self.operators {
            if op.sequence != 0 {
                groups.entry(op.sequence).or_default().push(op);
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{DocumentId, Span};

    fn op(name: &str, seq: u32, doc: &str) -> OperatorDecl {
        OperatorDecl {
            name: name.into(),
            struct_name: name.into(),
            package_path: "pkg".into(),
            relative_path: "a.go".into(),
            sequence: seq,
            document: DocumentId::new(doc),
            span: Span::from_coords(0, 0, 0, 1),
            struct_name_span: Span::from_coords(0, 0, 0, 1),
            discovered_at: SystemTime::now(),
        }
    }

    #[test]
    fn test_lookup_first_declaration_wins() {
        let index = WorkspaceIndex::build(
            1,
            vec![op("a1", 1, "a.flow"), op("a1", 2, "b.flow")],
            Vec::new(),
            Vec::new(),
        );
        assert_eq!(index.operator("a1").unwrap().document.as_str(), "a.flow");
        assert!(index.operator("missing").is_none());
    }

    #[test]
    fn test_sequence_grouping_excludes_sentinel() {
        let index = WorkspaceIndex::build(
            1,
            vec![op("a", 0, "a.flow"), op("b", 0, "b.flow"), op("c", 7, "c.flow")],
            Vec::new(),
            Vec::new(),
        );
        let groups = index.operators_by_sequence();
        assert!(!groups.contains_key(&0));
        assert_eq!(groups[&7].len(), 1);
    }

    #[test]
    fn test_list_accessors_are_copies() {
        let index = WorkspaceIndex::build(1, vec![op("a", 1, "a.flow")], Vec::new(), Vec::new());
        let mut copy = index.operators();
        copy.clear();
        assert_eq!(index.operator_count(), 1);
    }
}
