//! Logos-based lexer for the orchestration DSL.
//!
//! Fast tokenization using the logos crate. The lexer keeps trivia
//! (whitespace, comments) so callers can filter as needed, and tracks
//! line/column positions for every token.

use logos::Logos;

use crate::base::{Position, Span};

/// Logos token enum for the DSL surface.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*[^/])*\*/")]
    BlockComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r#""([^"\\]|\\.)*""#)]
    Str,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(",")]
    Comma,

    #[token(";")]
    Semi,

    #[token(":")]
    Colon,

    /// Anything the grammar does not know; skipped by the scanners.
    #[regex(r".", priority = 0)]
    Error,
}

impl TokenKind {
    /// Whitespace or comments.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }
}

/// A token with its kind, text, and line/column span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Span,
}

impl Token<'_> {
    /// The string literal's content with the surrounding quotes removed.
    ///
    /// Only meaningful for [`TokenKind::Str`] tokens.
    pub fn str_value(&self) -> &str {
        self.text
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(self.text)
    }
}

/// Lexer wrapping the logos-generated tokenizer.
///
/// Tracks line/column so every token carries a line-accurate [`Span`].
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    position: Position,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(input),
            position: Position::new(0, 0),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = match self.inner.next()? {
            Ok(kind) => kind,
            Err(()) => TokenKind::Error,
        };
        let text = self.inner.slice();
        let start = self.position;
        self.position = advance(start, text);

        Some(Token {
            kind,
            text,
            span: Span::new(start, self.position),
        })
    }
}

/// Advance a position across a slice of source text.
fn advance(mut position: Position, text: &str) -> Position {
    for ch in text.chars() {
        if ch == '\n' {
            position.line += 1;
            position.column = 0;
        } else {
            position.column += 1;
        }
    }
    position
}

/// Tokenize an entire string, dropping trivia.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).filter(|t| !t.kind.is_trivia()).collect()
}
