//! Syntax tree for the parts of a Go file that vendoring touches: the
//! package clause with its leading comments, and the import declarations.
//!
//! [`parse_header`] stops after the last import declaration, like an
//! imports-only parse. [`parse_file`] additionally checks that the rest of
//! the file is lexically valid and its delimiters balance, so a file that
//! would not compile is never rewritten.

use super::scanner::{Keyword, Scanner, Token, TokenKind};
use super::{Span, SyntaxError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub package_name: String,
    /// Span of the package name identifier.
    pub package_span: Span,
    pub package_line: usize,
    /// Text of the comment group directly above the package clause, with
    /// comment markers removed.
    pub doc: String,
    /// Tags named by `// +build` and `//go:build` lines above the package
    /// clause.
    pub build_tags: Vec<String>,
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<ImportDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Local name: an identifier, `_` or `.`.
    pub name: Option<String>,
    pub name_span: Option<Span>,
    /// Unquoted import path.
    pub path: String,
    /// Span of the quoted path literal.
    pub path_span: Span,
    pub line: usize,
    /// Line comment following the spec on the same line.
    pub comment: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    pub keyword: Span,
    pub lparen: Option<Token>,
    pub rparen: Option<Token>,
    /// Indices into [`SourceFile::imports`].
    pub specs: std::ops::Range<usize>,
    /// Every token between the parentheses (comments included, inserted
    /// semicolons excluded). Empty for single-spec declarations.
    pub inner: Vec<Token>,
}

impl ImportDecl {
    pub fn is_grouped(&self) -> bool {
        self.lparen.is_some()
    }
}

struct Parser<'a> {
    src: &'a [u8],
    scanner: Scanner<'a>,
    tok: Token,
    comments: Vec<Token>,
    trace: Option<Vec<Token>>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a [u8]) -> Result<Self, SyntaxError> {
        let mut parser = Self {
            src,
            scanner: Scanner::new(src),
            tok: Token {
                kind: TokenKind::Eof,
                span: Span::default(),
                line: 1,
                column: 1,
            },
            comments: Vec::new(),
            trace: None,
        };
        parser.advance()?;
        Ok(parser)
    }

    fn advance(&mut self) -> Result<(), SyntaxError> {
        loop {
            let tok = self.scanner.next_token();
            if let Some(err) = self.scanner.errors().first() {
                return Err(err.clone());
            }
            if let Some(trace) = self.trace.as_mut()
                && !tok.is_inserted_semicolon()
            {
                trace.push(tok);
            }
            if tok.kind == TokenKind::Comment {
                self.comments.push(tok);
                continue;
            }
            self.tok = tok;
            return Ok(());
        }
    }

    fn describe(&self, tok: &Token) -> String {
        match tok.kind {
            TokenKind::Eof => "EOF".to_string(),
            _ if tok.is_inserted_semicolon() => "newline".to_string(),
            _ => format!("'{}'", String::from_utf8_lossy(tok.text(self.src))),
        }
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        SyntaxError::at(
            &self.tok,
            format!("expected {}, found {}", expected, self.describe(&self.tok)),
        )
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, SyntaxError> {
        if self.tok.kind != kind {
            return Err(self.unexpected(expected));
        }
        let tok = self.tok;
        self.advance()?;
        Ok(tok)
    }

    /// A semicolon, optional before a closing `)` or `}`.
    fn expect_semi(&mut self) -> Result<(), SyntaxError> {
        match self.tok.kind {
            TokenKind::RParen | TokenKind::RBrace => Ok(()),
            TokenKind::Semicolon => self.advance(),
            _ => Err(self.unexpected("';'")),
        }
    }

    fn parse_header(&mut self) -> Result<SourceFile, SyntaxError> {
        if !self.tok.is_keyword(Keyword::Package) {
            return Err(self.unexpected("'package'"));
        }
        let package_tok = self.tok;
        let leading = std::mem::take(&mut self.comments);
        self.advance()?;

        let name_tok = self.expect(TokenKind::Ident, "package name")?;
        let package_name = String::from_utf8_lossy(name_tok.text(self.src)).into_owned();
        if package_name == "_" {
            return Err(SyntaxError::at(&name_tok, "invalid package name _"));
        }
        self.expect_semi()?;

        let mut file = SourceFile {
            package_name,
            package_span: name_tok.span,
            package_line: package_tok.line,
            doc: doc_text(self.src, &leading, package_tok.line),
            build_tags: build_tags(self.src, &leading),
            imports: Vec::new(),
            decls: Vec::new(),
        };

        while self.tok.is_keyword(Keyword::Import) {
            let decl = self.parse_import_decl(&mut file.imports)?;
            file.decls.push(decl);
        }
        Ok(file)
    }

    fn parse_import_decl(&mut self, imports: &mut Vec<ImportSpec>) -> Result<ImportDecl, SyntaxError> {
        let keyword = self.tok.span;
        let first = imports.len();
        self.advance()?;

        if self.tok.kind != TokenKind::LParen {
            let spec = self.parse_import_spec()?;
            imports.push(spec);
            return Ok(ImportDecl {
                keyword,
                lparen: None,
                rparen: None,
                specs: first..imports.len(),
                inner: Vec::new(),
            });
        }

        let lparen = self.tok;
        self.trace = Some(Vec::new());
        self.advance()?;
        while !matches!(self.tok.kind, TokenKind::RParen | TokenKind::Eof) {
            let spec = self.parse_import_spec()?;
            imports.push(spec);
        }
        if self.tok.kind != TokenKind::RParen {
            self.trace = None;
            return Err(self.unexpected("')'"));
        }
        let rparen = self.tok;
        let mut inner = self.trace.take().unwrap_or_default();
        inner.retain(|t| t.span.start < rparen.span.start);
        self.advance()?;
        self.expect_semi()?;

        Ok(ImportDecl {
            keyword,
            lparen: Some(lparen),
            rparen: Some(rparen),
            specs: first..imports.len(),
            inner,
        })
    }

    fn parse_import_spec(&mut self) -> Result<ImportSpec, SyntaxError> {
        let (name, name_span) = match self.tok.kind {
            TokenKind::Ident | TokenKind::Period => {
                let tok = self.tok;
                self.advance()?;
                (
                    Some(String::from_utf8_lossy(tok.text(self.src)).into_owned()),
                    Some(tok.span),
                )
            }
            _ => (None, None),
        };

        if !self.tok.is_string_literal() {
            return Err(self.unexpected("import path"));
        }
        let path_tok = self.tok;
        let path = unquote(path_tok.text(self.src))
            .filter(|p| is_valid_import_path(p))
            .ok_or_else(|| {
                SyntaxError::at(
                    &path_tok,
                    format!(
                        "invalid import path: {}",
                        String::from_utf8_lossy(path_tok.text(self.src))
                    ),
                )
            })?;
        self.advance()?;

        let seen = self.comments.len();
        self.expect_semi()?;
        let comment = self.comments[seen..]
            .iter()
            .find(|c| c.line == path_tok.line && self.src[c.span.start + 1] == b'/')
            .map(|c| c.span);

        Ok(ImportSpec {
            name,
            name_span,
            path,
            path_span: path_tok.span,
            line: path_tok.line,
            comment,
        })
    }

    /// Consumes the remainder of the file, checking delimiters balance and
    /// that no import declaration follows other declarations.
    fn check_body(&mut self) -> Result<(), SyntaxError> {
        let mut open: Vec<Token> = Vec::new();
        loop {
            match self.tok.kind {
                TokenKind::Eof => break,
                TokenKind::LParen | TokenKind::LBrack | TokenKind::LBrace => open.push(self.tok),
                TokenKind::RParen | TokenKind::RBrack | TokenKind::RBrace => {
                    let Some(opener) = open.pop() else {
                        return Err(SyntaxError::at(
                            &self.tok,
                            format!("unexpected {}", self.describe(&self.tok)),
                        ));
                    };
                    let wanted = closer_for(opener.kind);
                    if wanted != self.tok.kind {
                        return Err(self.unexpected(closer_text(wanted)));
                    }
                }
                TokenKind::Keyword(Keyword::Import) if open.is_empty() => {
                    return Err(SyntaxError::at(
                        &self.tok,
                        "imports must appear before other declarations",
                    ));
                }
                _ => {}
            }
            self.advance()?;
        }
        if let Some(opener) = open.last() {
            return Err(self.unexpected(closer_text(closer_for(opener.kind))));
        }
        Ok(())
    }
}

fn closer_for(kind: TokenKind) -> TokenKind {
    match kind {
        TokenKind::LParen => TokenKind::RParen,
        TokenKind::LBrack => TokenKind::RBrack,
        _ => TokenKind::RBrace,
    }
}

fn closer_text(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::RParen => "')'",
        TokenKind::RBrack => "']'",
        _ => "'}'",
    }
}

/// Parses the package clause and import declarations only.
pub fn parse_header(src: &[u8]) -> Result<SourceFile, SyntaxError> {
    Parser::new(src)?.parse_header()
}

/// Parses the header and validates the rest of the file.
pub fn parse_file(src: &[u8]) -> Result<SourceFile, SyntaxError> {
    let mut parser = Parser::new(src)?;
    let file = parser.parse_header()?;
    parser.check_body()?;
    Ok(file)
}

fn last_line(src: &[u8], tok: &Token) -> usize {
    tok.line + tok.text(src).iter().filter(|&&b| b == b'\n').count()
}

/// Compiler directives are not documentation.
fn is_directive(text: &str) -> bool {
    if text.starts_with("line ") || text.starts_with("extern ") || text.starts_with("export ") {
        return true;
    }
    match text.split_once(':') {
        Some((prefix, rest)) => {
            !prefix.is_empty()
                && prefix.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
                && rest
                    .bytes()
                    .next()
                    .is_some_and(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        }
        None => false,
    }
}

fn doc_text(src: &[u8], leading: &[Token], package_line: usize) -> String {
    let mut group_start = leading.len();
    let mut next_line = package_line;
    for (i, tok) in leading.iter().enumerate().rev() {
        if last_line(src, tok) + 1 != next_line {
            break;
        }
        group_start = i;
        next_line = tok.line;
    }

    let mut lines: Vec<String> = Vec::new();
    for tok in &leading[group_start..] {
        let text = String::from_utf8_lossy(tok.text(src));
        if let Some(body) = text.strip_prefix("//") {
            if is_directive(body) {
                continue;
            }
            lines.push(body.strip_prefix(' ').unwrap_or(body).to_string());
        } else {
            let body = text
                .strip_prefix("/*")
                .and_then(|t| t.strip_suffix("*/"))
                .unwrap_or(&text);
            lines.extend(body.lines().map(str::to_string));
        }
    }

    let mut out: Vec<&str> = Vec::new();
    for line in lines.iter().map(|l| l.trim_end()) {
        if line.is_empty() && out.last().is_none_or(|l| l.is_empty()) {
            continue;
        }
        out.push(line);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

fn build_tags(src: &[u8], leading: &[Token]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tok in leading {
        let text = String::from_utf8_lossy(tok.text(src));
        let Some(body) = text.strip_prefix("//") else {
            continue;
        };
        let words: Vec<String> = if let Some(expr) = body.strip_prefix("go:build") {
            expr.split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
                .filter(|w| !w.is_empty())
                .map(str::to_string)
                .collect()
        } else if let Some(expr) = body.trim_start().strip_prefix("+build") {
            expr.split(|c: char| c.is_whitespace() || c == ',')
                .map(|w| w.trim_start_matches('!'))
                .filter(|w| !w.is_empty())
                .map(str::to_string)
                .collect()
        } else {
            continue;
        };
        for word in words {
            if !tags.contains(&word) {
                tags.push(word);
            }
        }
    }
    tags.sort();
    tags
}

/// First sentence of a package comment with whitespace collapsed, the way
/// package listings show it. Boilerplate such as copyright notices yields an
/// empty synopsis.
pub fn synopsis(doc: &str) -> String {
    let chars: Vec<char> = doc
        .chars()
        .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
        .collect();

    let mut end = chars.len();
    let (mut ppp, mut pp, mut p) = ('\0', '\0', '\0');
    for (i, &q) in chars.iter().enumerate() {
        if q == ' ' && p == '.' && (!pp.is_uppercase() || ppp.is_uppercase()) {
            end = i;
            break;
        }
        if p == '。' || p == '．' {
            end = i;
            break;
        }
        ppp = pp;
        pp = p;
        p = q;
    }

    let sentence: String = chars[..end].iter().collect();
    let sentence = sentence.split_whitespace().collect::<Vec<_>>().join(" ");
    let lower = sentence.to_lowercase();
    if ["copyright", "all rights", "author"]
        .iter()
        .any(|prefix| lower.starts_with(prefix))
    {
        return String::new();
    }
    sentence
}

/// Decodes an interpreted or raw Go string literal.
pub fn unquote(lit: &[u8]) -> Option<String> {
    let (&first, rest) = lit.split_first()?;
    let (&last, body) = rest.split_last()?;
    if first != last {
        return None;
    }
    match first {
        b'`' => {
            let raw: Vec<u8> = body.iter().copied().filter(|&b| b != b'\r').collect();
            String::from_utf8(raw).ok()
        }
        b'"' => {
            let body = std::str::from_utf8(body).ok()?;
            let mut out = String::with_capacity(body.len());
            let mut chars = body.chars();
            while let Some(c) = chars.next() {
                if c != '\\' {
                    out.push(c);
                    continue;
                }
                let escaped = match chars.next()? {
                    'a' => '\u{7}',
                    'b' => '\u{8}',
                    'f' => '\u{c}',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    'v' => '\u{b}',
                    '\\' => '\\',
                    '"' => '"',
                    'x' => hex_escape(&mut chars, 2)?,
                    'u' => hex_escape(&mut chars, 4)?,
                    'U' => hex_escape(&mut chars, 8)?,
                    d @ '0'..='7' => {
                        let mut value = d.to_digit(8)?;
                        for _ in 0..2 {
                            value = value * 8 + chars.next()?.to_digit(8)?;
                        }
                        char::from_u32(value).filter(|_| value < 256)?
                    }
                    _ => return None,
                };
                out.push(escaped);
            }
            Some(out)
        }
        _ => None,
    }
}

fn hex_escape(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let mut value = 0u32;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(value)
}

/// Non-empty, and only graphic, non-space characters outside the set the
/// Go toolchain reserves.
pub fn is_valid_import_path(path: &str) -> bool {
    const ILLEGAL: &str = "!\"#$%&'()*,:;<=>?[\\]^{|}`\u{FFFD}";
    !path.is_empty()
        && path
            .chars()
            .all(|c| !c.is_whitespace() && !c.is_control() && !ILLEGAL.contains(c))
}

/// Go string literal for `s`.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &str = r#"// Copyright 2014 The Authors.

// +build linux,!cgo darwin

// Package json implements encoding and decoding of JSON. More text
// follows here.
package json // import "encoding/json"

import "bytes"

import (
	"fmt" // formatting
	u "unicode/utf8"
	_ `os`

	. "strings"
)

func f() { fmt.Println(u.RuneError) }
"#;

    #[test]
    fn test_parse_header_collects_imports() {
        let file = parse_file(FILE.as_bytes()).unwrap();
        assert_eq!(file.package_name, "json");
        assert_eq!(file.package_line, 7);
        let paths: Vec<&str> = file.imports.iter().map(|s| s.path.as_str()).collect();
        assert_eq!(paths, vec!["bytes", "fmt", "unicode/utf8", "os", "strings"]);
        assert_eq!(file.imports[2].name.as_deref(), Some("u"));
        assert_eq!(file.imports[3].name.as_deref(), Some("_"));
        assert_eq!(file.imports[4].name.as_deref(), Some("."));
        assert_eq!(file.decls.len(), 2);
        assert!(!file.decls[0].is_grouped());
        assert_eq!(file.decls[1].specs, 1..5);
    }

    #[test]
    fn test_byte_order_mark_before_package_clause() {
        let src = "\u{FEFF}package a\n\nimport \"old/lib\"\n";
        let file = parse_file(src.as_bytes()).unwrap();
        assert_eq!(file.package_name, "a");
        assert_eq!(file.imports[0].path, "old/lib");
        let span = file.imports[0].path_span;
        assert_eq!(&src[span.start..span.end], "\"old/lib\"");
    }

    #[test]
    fn test_trailing_comment_attached_to_spec() {
        let file = parse_header(FILE.as_bytes()).unwrap();
        let fmt = &file.imports[1];
        let comment = fmt.comment.expect("comment on fmt import");
        assert_eq!(&FILE[comment.start..comment.end], "// formatting");
        assert!(file.imports[2].comment.is_none());
    }

    #[test]
    fn test_doc_and_build_tags() {
        let file = parse_header(FILE.as_bytes()).unwrap();
        assert_eq!(
            file.doc,
            "Package json implements encoding and decoding of JSON. More text\nfollows here."
        );
        assert_eq!(file.build_tags, vec!["cgo", "darwin", "linux"]);
        assert_eq!(
            synopsis(&file.doc),
            "Package json implements encoding and decoding of JSON."
        );
    }

    #[test]
    fn test_synopsis_drops_copyright() {
        assert_eq!(synopsis("Copyright 2014 Someone. All rights reserved."), "");
        assert_eq!(synopsis("Package a is A. B. C."), "Package a is A. B. C.");
    }

    #[test]
    fn test_missing_package_clause() {
        let err = parse_header(b"// nothing here\nfunc main() {}\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("expected 'package'"));
    }

    #[test]
    fn test_unbalanced_body_rejected() {
        let src = b"package a\n\nimport \"fmt\"\n\nfunc f() {\n\tfmt.Println(\n}\n";
        assert!(parse_header(src).is_ok());
        let err = parse_file(src).unwrap_err();
        assert_eq!(err.line, 7);
    }

    #[test]
    fn test_late_import_rejected() {
        let src = b"package a\n\nvar x = 1\n\nimport \"fmt\"\n";
        let err = parse_file(src).unwrap_err();
        assert!(err.message.contains("imports must appear before"));
    }

    #[test]
    fn test_invalid_import_path() {
        let err = parse_header(b"package a\nimport \"\"\n").unwrap_err();
        assert!(err.message.contains("invalid import path"));
        assert!(parse_header(b"package a\nimport \"a b\"\n").is_err());
    }

    #[test]
    fn test_unquote_and_quote() {
        assert_eq!(unquote(br#""a\x2fb""#).as_deref(), Some("a/b"));
        assert_eq!(unquote(b"`raw/path`").as_deref(), Some("raw/path"));
        assert_eq!(unquote(br#""\q""#), None);
        assert_eq!(quote("new/path"), "\"new/path\"");
        assert_eq!(quote(r#"a"b"#), r#""a\"b""#);
    }
}
