//! Declaration extraction: logos lexer, DSL scanner, host-language scanner.
//!
//! Extraction is deliberately lossy: text that does not match the expected
//! declaration shapes is skipped without raising an error, so a half-typed
//! document still yields every declaration that *is* well formed.

pub mod keywords;

mod dsl;
mod host;
mod lexer;

pub use dsl::{
    CallSite, DslExtraction, ExpansionRef, RawFragment, RawOperator, extract_dsl,
};
pub use host::{HostExtraction, RawStruct, extract_host, package_path_for};
pub use lexer::{Lexer, Token, TokenKind, tokenize};
