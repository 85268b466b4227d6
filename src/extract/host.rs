//! Struct declaration extraction for host-language (Go-style) source files.
//!
//! A line-oriented scan is enough here: the index only needs the package
//! marker and top-level `type <Name> struct { ... }` headers, with a
//! line-accurate span for each name.

use smol_str::SmolStr;

use crate::base::{DocumentId, Span};

/// A struct declaration as written in a host-language file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStruct {
    pub name: SmolStr,
    /// Span of the struct name in the `type` header.
    pub span: Span,
}

/// Everything extracted from one host-language file.
#[derive(Debug, Clone, Default)]
pub struct HostExtraction {
    /// The package marker at the top of the file, if present.
    pub package: Option<SmolStr>,
    pub structs: Vec<RawStruct>,
}

/// Extract the package marker and struct declarations from one file.
pub fn extract_host(text: &str) -> HostExtraction {
    let mut out = HostExtraction::default();
    // The marker only counts at the top of the file: the first line that is
    // neither blank nor a comment. A stray `package`-prefixed line later in
    // the file is ordinary code.
    let mut in_header = true;

    for (line_no, line) in text.lines().enumerate() {
        let trimmed = line.trim_start();

        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        if in_header
            && let Some(rest) = trimmed.strip_prefix("package ")
            && let Some(name) = first_ident(rest)
        {
            out.package = Some(SmolStr::new(name));
            in_header = false;
            continue;
        }
        in_header = false;

        if let Some(decl) = match_struct_header(line, line_no) {
            out.structs.push(decl);
        }
    }

    out
}

/// The package path for a host file: the package marker when it carries
/// grouping information, otherwise the enclosing directory name. The
/// conventional entry package (`main`) carries none.
pub fn package_path_for(extraction: &HostExtraction, document: &DocumentId) -> SmolStr {
    match extraction.package.as_deref() {
        Some("main") | None => SmolStr::new(document.parent_dir_name().unwrap_or("")),
        Some(pkg) => SmolStr::new(pkg),
    }
}

/// Match `type <Name> struct` in one line, returning the name and its span.
fn match_struct_header(line: &str, line_no: usize) -> Option<RawStruct> {
    let trimmed = line.trim_start();
    let rest = trimmed.strip_prefix("type ")?;
    let body = rest.trim_start();
    let name = first_ident(body)?;
    let after_name = body[name.len()..].trim_start();
    if after_name != "struct"
        && !after_name.starts_with("struct ")
        && !after_name.starts_with("struct{")
    {
        return None;
    }

    let col = (line.len() - trimmed.len()) + "type ".len() + (rest.len() - body.len());
    Some(RawStruct {
        name: SmolStr::new(name),
        span: Span::for_token(line_no, col, name.len()),
    })
}

/// The leading identifier of a string slice, if it starts with one.
fn first_ident(s: &str) -> Option<&str> {
    let s = s.trim_start();
    let mut chars = s.char_indices();
    let (_, first) = chars.next()?;
    if !(unicode_ident::is_xid_start(first) || first == '_') {
        return None;
    }
    let end = chars
        .find(|(_, c)| !(unicode_ident::is_xid_continue(*c) || *c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    Some(&s[..end])
}
