//! Go source handling.
//!
//! Just enough of the language to vendor packages safely:
//!
//! - [`scanner`] - comment-preserving tokenizer with semicolon insertion
//! - [`ast`] - package clause and import declarations as a syntax tree
//! - [`printer`] - import rewriting and canonical import block rendering

pub mod ast;
pub mod printer;
pub mod scanner;

pub use ast::{ImportDecl, ImportSpec, SourceFile, parse_file, parse_header};
pub use printer::{Rewritten, rewrite_imports};
pub use scanner::{Keyword, Scanner, Token, TokenKind, tokenize};

use thiserror::Error;

/// Half-open byte range into a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl SyntaxError {
    pub(crate) fn at(tok: &Token, message: impl Into<String>) -> Self {
        Self {
            line: tok.line,
            column: tok.column,
            message: message.into(),
        }
    }
}
