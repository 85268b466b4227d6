//! Reserved words of the orchestration DSL.
//!
//! These never count as operator invocations in the call-site scan.

/// The fixed reserved-keyword set of the DSL.
pub const RESERVED: &[&str] = &[
    "main",        // entry point block
    "register",    // registration block marker
    "op",          // operator declaration marker
    "fragment",    // fragment definition marker
    "expand",      // fragment expansion directive
    "finish",      // finish hook block
    "go",          // async launch
    "wait",        // async await
    "skip",
    "switch",
    "case",
    "wrap",
    "nocheckmiss", // miss-check suppression
];

/// Check whether an identifier is a reserved DSL keyword.
pub fn is_reserved(ident: &str) -> bool {
    RESERVED.contains(&ident)
}
