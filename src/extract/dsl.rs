//! Declaration extraction for orchestration DSL documents.
//!
//! One linear scan over the token stream collects, per document:
//!
//! - operator declarations from `register("pkg") { op(...); }` blocks
//! - fragment definitions from `fragment("name") { ... }` blocks
//! - fragment expansion sites (`expand("name")`)
//! - operator call sites outside every registration block
//! - the brace-balanced extents of every registration block
//!
//! Block extents are computed by counting `{`/`}` pairs, never by matching
//! the first closing brace, since bodies nest `switch`/`wrap`/`finish`
//! constructs. Text that does not match a declaration shape is skipped
//! silently; the extractor never fails.

use smol_str::SmolStr;

use crate::base::{Position, Span};

use super::keywords;
use super::lexer::{Token, TokenKind, tokenize};

/// An operator declaration as written in a registration block.
///
/// The 3-argument `op` form defaults the invocation name to the struct name;
/// the 4-argument form supplies an explicit invocation name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOperator {
    /// Invocation name (intended-unique workspace-wide).
    pub name: SmolStr,
    /// Host-language struct backing this operator.
    pub struct_name: SmolStr,
    /// Package path of the enclosing registration block.
    pub package_path: SmolStr,
    /// Host file path relative to the package.
    pub relative_path: SmolStr,
    /// Sequence tag; 0 is the "absent/invalid" sentinel.
    pub sequence: u32,
    /// Span of the whole `op(...)` entry.
    pub span: Span,
    /// Span of the struct-name string argument (for goto classification).
    pub struct_name_span: Span,
}

/// A fragment definition (`fragment("name") { ... }`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFragment {
    pub name: SmolStr,
    /// Span of the whole block, brace-balanced.
    pub span: Span,
    /// Span of the name string argument.
    pub name_span: Span,
}

/// A fragment expansion site (`expand("name")`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionRef {
    pub name: SmolStr,
    /// Span of the name string argument.
    pub span: Span,
}

/// An operator invocation site outside any registration block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub name: SmolStr,
    /// Span of the invoked identifier.
    pub span: Span,
}

/// Everything extracted from one DSL document.
#[derive(Debug, Clone, Default)]
pub struct DslExtraction {
    pub operators: Vec<RawOperator>,
    pub fragments: Vec<RawFragment>,
    pub expansions: Vec<ExpansionRef>,
    pub calls: Vec<CallSite>,
    /// Brace-balanced extents of every registration block, in document order.
    pub registration_spans: Vec<Span>,
}

/// Extract all declarations and reference sites from one DSL document.
pub fn extract_dsl(text: &str) -> DslExtraction {
    Scanner::new(text).run()
}

/// An open brace-balanced block being tracked by the scanner.
struct OpenBlock {
    /// Brace depth just after the block's opening `{`.
    depth: usize,
    start: Position,
    kind: BlockKind,
}

enum BlockKind {
    Registration,
    Fragment { name: SmolStr, name_span: Span },
}

struct Scanner<'a> {
    tokens: Vec<Token<'a>>,
    out: DslExtraction,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            tokens: tokenize(text),
            out: DslExtraction::default(),
        }
    }

    fn run(mut self) -> DslExtraction {
        let mut depth = 0usize;
        let mut open: Vec<OpenBlock> = Vec::new();
        // Package path of the innermost open registration block, if any.
        let mut package: Option<SmolStr> = None;

        let mut i = 0;
        while i < self.tokens.len() {
            let tok = self.tokens[i].clone();
            match tok.kind {
                TokenKind::LBrace => {
                    depth += 1;
                    i += 1;
                }
                TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    while open.last().is_some_and(|b| depth < b.depth) {
                        let Some(block) = open.pop() else { break };
                        let span = Span::new(block.start, tok.span.end);
                        match block.kind {
                            BlockKind::Registration => {
                                self.out.registration_spans.push(span);
                                package = None;
                            }
                            BlockKind::Fragment { name, name_span } => {
                                self.out.fragments.push(RawFragment {
                                    name,
                                    span,
                                    name_span,
                                });
                            }
                        }
                    }
                    i += 1;
                }
                TokenKind::Ident => {
                    let in_registration = package.is_some();
                    match tok.text {
                        "register" if !in_registration => {
                            if let Some((arg, body)) = self.match_block_header(i) {
                                package = Some(SmolStr::new(arg.str_value()));
                                open.push(OpenBlock {
                                    depth: depth + 1,
                                    start: tok.span.start,
                                    kind: BlockKind::Registration,
                                });
                                depth += 1;
                                i = body + 1;
                                continue;
                            }
                            i += 1;
                        }
                        "fragment" if !in_registration => {
                            if let Some((arg, body)) = self.match_block_header(i) {
                                open.push(OpenBlock {
                                    depth: depth + 1,
                                    start: tok.span.start,
                                    kind: BlockKind::Fragment {
                                        name: SmolStr::new(arg.str_value()),
                                        name_span: arg.span,
                                    },
                                });
                                depth += 1;
                                i = body + 1;
                                continue;
                            }
                            i += 1;
                        }
                        "expand" if !in_registration => {
                            if let Some((arg, end)) = self.match_directive(i) {
                                self.out.expansions.push(ExpansionRef {
                                    name: SmolStr::new(arg.str_value()),
                                    span: arg.span,
                                });
                                i = end + 1;
                                continue;
                            }
                            i += 1;
                        }
                        "op" if in_registration => {
                            if let Some(next) = self.consume_op_entry(i, package.as_ref()) {
                                i = next;
                                continue;
                            }
                            i += 1;
                        }
                        ident if !in_registration && !keywords::is_reserved(ident) => {
                            // An invocation is an identifier immediately
                            // followed by `(` with no space between.
                            let is_call = self
                                .tokens
                                .get(i + 1)
                                .is_some_and(|n| {
                                    n.kind == TokenKind::LParen && n.span.start == tok.span.end
                                });
                            if is_call && ident.chars().all(is_ident_char) {
                                self.out.calls.push(CallSite {
                                    name: SmolStr::new(ident),
                                    span: tok.span,
                                });
                            }
                            i += 1;
                        }
                        _ => i += 1,
                    }
                }
                _ => i += 1,
            }
        }

        self.out
    }

    /// Match `<kw> ( "arg" ) {` starting at `i` (the keyword index).
    ///
    /// Returns the string-argument token and the index of the opening brace.
    fn match_block_header(&self, i: usize) -> Option<(Token<'a>, usize)> {
        let arg = match (
            self.tokens.get(i + 1)?.kind,
            self.tokens.get(i + 2)?,
            self.tokens.get(i + 3)?.kind,
            self.tokens.get(i + 4)?.kind,
        ) {
            (TokenKind::LParen, arg, TokenKind::RParen, TokenKind::LBrace)
                if arg.kind == TokenKind::Str =>
            {
                arg.clone()
            }
            _ => return None,
        };
        Some((arg, i + 4))
    }

    /// Match `<kw> ( "arg" )` starting at `i`. Returns the string-argument
    /// token and the index of the closing paren.
    fn match_directive(&self, i: usize) -> Option<(Token<'a>, usize)> {
        match (
            self.tokens.get(i + 1)?.kind,
            self.tokens.get(i + 2)?,
            self.tokens.get(i + 3)?.kind,
        ) {
            (TokenKind::LParen, arg, TokenKind::RParen) if arg.kind == TokenKind::Str => {
                Some((arg.clone(), i + 3))
            }
            _ => None,
        }
    }

    /// Consume one `op(...)` entry starting at `i` (the `op` keyword).
    ///
    /// Accepted shapes (malformed entries are skipped, never an error):
    /// - `op("rel/path.go", "Struct", seq)` — name defaults to the struct name
    /// - `op("rel/path.go", "Struct", "name", seq)`
    ///
    /// Returns the index just past the entry on a successful match.
    fn consume_op_entry(&mut self, i: usize, package: Option<&SmolStr>) -> Option<usize> {
        let op_tok = self.tokens.get(i)?.clone();
        if self.tokens.get(i + 1)?.kind != TokenKind::LParen {
            return None;
        }

        // Collect argument tokens up to the closing paren of this entry.
        let mut args: Vec<Token<'a>> = Vec::new();
        let mut j = i + 2;
        loop {
            let tok = self.tokens.get(j)?;
            match tok.kind {
                TokenKind::RParen => break,
                TokenKind::Comma => {}
                TokenKind::Str | TokenKind::Integer => args.push(tok.clone()),
                // Anything else means this is not a well-formed entry.
                _ => return None,
            }
            j += 1;
        }
        let close = self.tokens.get(j)?.clone();

        let kinds: Vec<TokenKind> = args.iter().map(|t| t.kind).collect();
        let (relative_path, struct_tok, name, sequence_tok) = match kinds.as_slice() {
            [TokenKind::Str, TokenKind::Str, TokenKind::Integer] => (
                args[0].str_value(),
                &args[1],
                SmolStr::new(args[1].str_value()),
                &args[2],
            ),
            [TokenKind::Str, TokenKind::Str, TokenKind::Str, TokenKind::Integer] => (
                args[0].str_value(),
                &args[1],
                SmolStr::new(args[2].str_value()),
                &args[3],
            ),
            _ => return Some(j + 1),
        };

        // Sequence parse failure degrades to the 0 sentinel ("absent").
        let sequence = sequence_tok.text.parse::<u32>().unwrap_or(0);

        self.out.operators.push(RawOperator {
            name,
            struct_name: SmolStr::new(struct_tok.str_value()),
            package_path: package.cloned().unwrap_or_default(),
            relative_path: SmolStr::new(relative_path),
            sequence,
            span: Span::new(op_tok.span.start, close.span.end),
            struct_name_span: struct_tok.span,
        });
        Some(j + 1)
    }
}

fn is_ident_char(ch: char) -> bool {
    unicode_ident::is_xid_continue(ch) || ch == '_'
}
