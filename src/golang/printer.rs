//! Import rewriting.
//!
//! Only import declarations are touched. A rewritten path literal is
//! replaced in place; a parenthesized block containing a rewritten spec is
//! rendered in canonical form so trailing comments stay aligned: tab
//! indentation, one space between local name and path, comments aligned
//! with spaces one column past the widest spec of each consecutive run.
//! Blocks with layouts that cannot be rendered that way (several specs on
//! one line, block comments around specs) keep their layout and only the
//! literal changes. Every byte outside the edited regions is preserved.

use super::ast::{ImportDecl, SourceFile, quote};
use super::scanner::TokenKind;
use super::Span;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub source: Vec<u8>,
    /// Distinct `(old, new)` pairs that matched at least one spec, in
    /// source order.
    pub applied: Vec<(String, String)>,
}

/// Applies `rewrites` (old import path to new) to the imports of `file`.
/// Each spec is looked up once by its original path, so chained entries
/// (`a -> b`, `b -> c`) never compound. Returns `None` when no import
/// matched, leaving the caller free to skip writing the file.
pub fn rewrite_imports(
    src: &[u8],
    file: &SourceFile,
    rewrites: &BTreeMap<String, String>,
) -> Option<Rewritten> {
    let literals: Vec<Option<String>> = file
        .imports
        .iter()
        .map(|spec| rewrites.get(&spec.path).map(|new| quote(new)))
        .collect();
    if literals.iter().all(Option::is_none) {
        return None;
    }

    let mut applied: Vec<(String, String)> = Vec::new();
    for spec in &file.imports {
        if let Some(new) = rewrites.get(&spec.path) {
            let pair = (spec.path.clone(), new.clone());
            if !applied.contains(&pair) {
                applied.push(pair);
            }
        }
    }

    let mut edits: Vec<(Span, String)> = Vec::new();
    for decl in &file.decls {
        if literals[decl.specs.clone()].iter().all(Option::is_none) {
            continue;
        }
        if let Some((span, text)) = render_block(src, file, decl, &literals) {
            edits.push((span, text));
            continue;
        }
        for i in decl.specs.clone() {
            if let Some(lit) = &literals[i] {
                edits.push((file.imports[i].path_span, lit.clone()));
            }
        }
    }
    edits.sort_by_key(|(span, _)| span.start);

    let mut source = Vec::with_capacity(src.len() + 64);
    let mut last = 0;
    for (span, text) in edits {
        source.extend_from_slice(&src[last..span.start]);
        source.extend_from_slice(text.as_bytes());
        last = span.end;
    }
    source.extend_from_slice(&src[last..]);

    Some(Rewritten { source, applied })
}

enum Row {
    Blank,
    Comment(String),
    Spec { cell: String, comment: Option<String> },
}

/// Canonical text for a parenthesized import block, spanning from its `(`
/// to its `)`, or `None` when the block's layout is not a plain one spec
/// per line.
fn render_block(
    src: &[u8],
    file: &SourceFile,
    decl: &ImportDecl,
    literals: &[Option<String>],
) -> Option<(Span, String)> {
    let (lparen, rparen) = (decl.lparen?, decl.rparen?);
    if lparen.line == rparen.line {
        return None;
    }
    for tok in &decl.inner {
        if tok.kind == TokenKind::Semicolon || tok.text(src).contains(&b'\n') {
            return None;
        }
        if tok.line == lparen.line || tok.line == rparen.line {
            return None;
        }
    }

    let text = |span: Span| String::from_utf8_lossy(&src[span.start..span.end]).into_owned();
    let newline = line_ending(src, lparen.span.end);

    let mut rows: Vec<Row> = Vec::new();
    for line in lparen.line + 1..rparen.line {
        let tokens: Vec<_> = decl.inner.iter().filter(|t| t.line == line).collect();
        if tokens.is_empty() {
            rows.push(Row::Blank);
            continue;
        }
        if tokens.len() == 1 && tokens[0].kind == TokenKind::Comment {
            rows.push(Row::Comment(text(tokens[0].span)));
            continue;
        }

        let mut specs = decl.specs.clone().filter(|&i| file.imports[i].line == line);
        let (Some(i), None) = (specs.next(), specs.next()) else {
            return None;
        };
        let spec = &file.imports[i];
        let expected =
            1 + usize::from(spec.name.is_some()) + usize::from(spec.comment.is_some());
        if tokens.len() != expected {
            return None;
        }

        let literal = literals[i].clone().unwrap_or_else(|| text(spec.path_span));
        let cell = match &spec.name {
            Some(name) => format!("{name} {literal}"),
            None => literal,
        };
        rows.push(Row::Spec {
            cell,
            comment: spec.comment.map(text),
        });
    }

    // Collapse blank runs and trim blanks next to the parentheses.
    let mut compact: Vec<Row> = Vec::with_capacity(rows.len());
    for row in rows {
        let blank = matches!(row, Row::Blank);
        if blank && compact.last().is_none_or(|r| matches!(r, Row::Blank)) {
            continue;
        }
        compact.push(row);
    }
    while compact.last().is_some_and(|r| matches!(r, Row::Blank)) {
        compact.pop();
    }

    let mut widths = vec![0usize; compact.len()];
    let commented = |row: &Row| matches!(row, Row::Spec { comment: Some(_), .. });
    let mut i = 0;
    while i < compact.len() {
        if !commented(&compact[i]) {
            i += 1;
            continue;
        }
        let mut j = i;
        let mut max = 0;
        while j < compact.len() && commented(&compact[j]) {
            if let Row::Spec { cell, .. } = &compact[j] {
                max = max.max(cell.chars().count());
            }
            j += 1;
        }
        widths[i..j].fill(max);
        i = j;
    }

    let mut out = format!("({newline}");
    for (row, width) in compact.iter().zip(widths) {
        match row {
            Row::Blank => {}
            Row::Comment(comment) => {
                out.push('\t');
                out.push_str(comment);
            }
            Row::Spec { cell, comment } => {
                out.push('\t');
                out.push_str(cell);
                if let Some(comment) = comment {
                    let pad = width - cell.chars().count() + 1;
                    out.push_str(&" ".repeat(pad));
                    out.push_str(comment);
                }
            }
        }
        out.push_str(newline);
    }
    out.push(')');

    Some((Span::new(lparen.span.start, rparen.span.end), out))
}

/// Terminator of the line containing `offset`: `\r\n` when the source uses
/// it there, `\n` otherwise.
fn line_ending(src: &[u8], offset: usize) -> &'static str {
    match src[offset..].iter().position(|&b| b == b'\n') {
        Some(i) if i > 0 && src[offset + i - 1] == b'\r' => "\r\n",
        _ => "\n",
    }
}
