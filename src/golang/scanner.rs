//! Go tokenizer.
//!
//! Byte-oriented and comment-preserving. Follows the Go scanner's automatic
//! semicolon insertion: after an identifier, a literal, one of the keywords
//! `break continue fallthrough return`, the operators `++ --` or a closing
//! `) ] }`, a newline, the end of file, or a comment running to the end of
//! the line yields a [`TokenKind::Semicolon`] with an empty span placed at the
//! newline or comment start.

use super::{Span, SyntaxError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Break,
    Case,
    Chan,
    Const,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Func,
    Go,
    Goto,
    If,
    Import,
    Interface,
    Map,
    Package,
    Range,
    Return,
    Select,
    Struct,
    Switch,
    Type,
    Var,
}

impl Keyword {
    fn lookup(ident: &[u8]) -> Option<Keyword> {
        let kw = match ident {
            b"break" => Keyword::Break,
            b"case" => Keyword::Case,
            b"chan" => Keyword::Chan,
            b"const" => Keyword::Const,
            b"continue" => Keyword::Continue,
            b"default" => Keyword::Default,
            b"defer" => Keyword::Defer,
            b"else" => Keyword::Else,
            b"fallthrough" => Keyword::Fallthrough,
            b"for" => Keyword::For,
            b"func" => Keyword::Func,
            b"go" => Keyword::Go,
            b"goto" => Keyword::Goto,
            b"if" => Keyword::If,
            b"import" => Keyword::Import,
            b"interface" => Keyword::Interface,
            b"map" => Keyword::Map,
            b"package" => Keyword::Package,
            b"range" => Keyword::Range,
            b"return" => Keyword::Return,
            b"select" => Keyword::Select,
            b"struct" => Keyword::Struct,
            b"switch" => Keyword::Switch,
            b"type" => Keyword::Type,
            b"var" => Keyword::Var,
            _ => return None,
        };
        Some(kw)
    }

    fn ends_statement(self) -> bool {
        matches!(
            self,
            Keyword::Break | Keyword::Continue | Keyword::Fallthrough | Keyword::Return
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Int,
    Float,
    Imag,
    Char,
    /// Interpreted (`"..."`) string literal.
    String,
    /// Raw (`` `...` ``) string literal.
    RawString,
    Keyword(Keyword),
    Comment,
    Semicolon,
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Comma,
    Period,
    Colon,
    Inc,
    Dec,
    /// Any other operator or punctuation.
    Operator,
    Illegal,
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// 1-based line of the token start.
    pub line: usize,
    /// 1-based byte column of the token start.
    pub column: usize,
}

impl Token {
    pub fn text<'a>(&self, src: &'a [u8]) -> &'a [u8] {
        &src[self.span.start..self.span.end]
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_keyword(&self, kw: Keyword) -> bool {
        self.kind == TokenKind::Keyword(kw)
    }

    /// Semicolon produced by a newline, a comment or end of file rather
    /// than written in the source.
    pub fn is_inserted_semicolon(&self) -> bool {
        self.kind == TokenKind::Semicolon && self.span.is_empty()
    }

    pub fn is_string_literal(&self) -> bool {
        matches!(self.kind, TokenKind::String | TokenKind::RawString)
    }
}

pub struct Scanner<'a> {
    src: &'a [u8],
    pos: usize,
    line: usize,
    line_start: usize,
    insert_semi: bool,
    done: bool,
    errors: Vec<SyntaxError>,
}

/// UTF-8 byte order mark, ignored at the start of a file.
const BOM: &[u8] = b"\xEF\xBB\xBF";

impl<'a> Scanner<'a> {
    /// Offsets stay relative to `src` even when a leading byte order mark is
    /// skipped.
    pub fn new(src: &'a [u8]) -> Self {
        Self {
            src,
            pos: if src.starts_with(BOM) { BOM.len() } else { 0 },
            line: 1,
            line_start: 0,
            insert_semi: false,
            done: false,
            errors: Vec::new(),
        }
    }

    /// Lexical errors seen so far. Scanning continues past them.
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    #[inline(always)]
    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    #[inline(always)]
    fn peek_at(&self, n: usize) -> Option<u8> {
        self.src.get(self.pos + n).copied()
    }

    #[inline(always)]
    fn bump(&mut self) {
        if let Some(b) = self.peek() {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                self.line_start = self.pos;
            }
        }
    }

    fn error(&mut self, offset: usize, line: usize, line_start: usize, message: &str) {
        self.errors.push(SyntaxError {
            line,
            column: offset - line_start + 1,
            message: message.to_string(),
        });
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b' ' | b'\t' | b'\r' => self.bump(),
                b'\n' if !self.insert_semi => self.bump(),
                _ => break,
            }
        }
    }

    fn token(&self, kind: TokenKind, start: usize, line: usize, line_start: usize) -> Token {
        Token {
            kind,
            span: Span::new(start, self.pos),
            line,
            column: start - line_start + 1,
        }
    }

    fn inserted_semicolon(&mut self, at: usize) -> Token {
        self.insert_semi = false;
        Token {
            kind: TokenKind::Semicolon,
            span: Span::new(at, at),
            line: self.line,
            column: at - self.line_start + 1,
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.pos;
        let line = self.line;
        let line_start = self.line_start;

        let Some(b) = self.peek() else {
            if self.insert_semi {
                return self.inserted_semicolon(start);
            }
            return self.token(TokenKind::Eof, start, line, line_start);
        };

        let mut insert = false;
        let kind = match b {
            b'\n' => {
                // Only reachable while a semicolon is pending.
                let tok = self.inserted_semicolon(start);
                self.bump();
                return tok;
            }
            b if is_letter(b) => {
                while self.peek().is_some_and(|c| is_letter(c) || c.is_ascii_digit()) {
                    self.bump();
                }
                match Keyword::lookup(&self.src[start..self.pos]) {
                    Some(kw) => {
                        insert = kw.ends_statement();
                        TokenKind::Keyword(kw)
                    }
                    None => {
                        insert = true;
                        TokenKind::Ident
                    }
                }
            }
            b'0'..=b'9' => {
                insert = true;
                self.scan_number()
            }
            b'.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                insert = true;
                self.scan_number()
            }
            b'"' => {
                insert = true;
                self.scan_string(line, line_start);
                TokenKind::String
            }
            b'`' => {
                insert = true;
                self.scan_raw_string(line, line_start);
                TokenKind::RawString
            }
            b'\'' => {
                insert = true;
                self.scan_rune(line, line_start);
                TokenKind::Char
            }
            b'/' if matches!(self.peek_at(1), Some(b'/') | Some(b'*')) => {
                if self.insert_semi && self.comment_reaches_line_end() {
                    return self.inserted_semicolon(start);
                }
                self.scan_comment(line, line_start);
                self.insert_semi = false;
                return Token {
                    kind: TokenKind::Comment,
                    span: Span::new(start, self.comment_end(start)),
                    line,
                    column: start - line_start + 1,
                };
            }
            _ => match self.scan_operator() {
                Some(kind) => {
                    insert = matches!(
                        kind,
                        TokenKind::RParen
                            | TokenKind::RBrack
                            | TokenKind::RBrace
                            | TokenKind::Inc
                            | TokenKind::Dec
                    );
                    kind
                }
                None => {
                    self.bump();
                    self.error(start, line, line_start, "illegal character");
                    insert = self.insert_semi;
                    TokenKind::Illegal
                }
            },
        };

        self.insert_semi = insert;
        self.token(kind, start, line, line_start)
    }

    /// Line comments end before the newline, and before a trailing `\r` so
    /// that removing a comment never splits a CRLF pair.
    fn comment_end(&self, start: usize) -> usize {
        if self.src[start + 1] == b'/' && self.pos > start + 2 && self.src[self.pos - 1] == b'\r'
        {
            self.pos - 1
        } else {
            self.pos
        }
    }

    fn scan_comment(&mut self, line: usize, line_start: usize) {
        let start = self.pos;
        self.bump();
        if self.peek() == Some(b'/') {
            while self.peek().is_some_and(|c| c != b'\n') {
                self.bump();
            }
            return;
        }
        self.bump();
        loop {
            match self.peek() {
                None => {
                    self.error(start, line, line_start, "comment not terminated");
                    return;
                }
                Some(b'*') if self.peek_at(1) == Some(b'/') => {
                    self.bump();
                    self.bump();
                    return;
                }
                Some(_) => self.bump(),
            }
        }
    }

    /// Whether the comments starting at the current position run to the end
    /// of the line, which is where a pending semicolon must be placed.
    fn comment_reaches_line_end(&self) -> bool {
        let src = self.src;
        let mut i = self.pos;
        while i < src.len() && src[i] == b'/' {
            match src.get(i + 1) {
                Some(b'/') => return true,
                Some(b'*') => {
                    i += 2;
                    let mut closed = false;
                    while i < src.len() {
                        if src[i] == b'\n' {
                            return true;
                        }
                        if src[i] == b'*' && src.get(i + 1) == Some(&b'/') {
                            i += 2;
                            closed = true;
                            break;
                        }
                        i += 1;
                    }
                    if !closed {
                        return true;
                    }
                    while i < src.len() && matches!(src[i], b' ' | b'\t' | b'\r') {
                        i += 1;
                    }
                    if i >= src.len() || src[i] == b'\n' {
                        return true;
                    }
                }
                _ => return false,
            }
        }
        false
    }

    fn scan_number(&mut self) -> TokenKind {
        let mut kind = TokenKind::Int;
        let hex = self.peek() == Some(b'0') && matches!(self.peek_at(1), Some(b'x') | Some(b'X'));
        if hex {
            self.bump();
            self.bump();
        }
        let mut seen_dot = false;
        let mut seen_exp = false;
        while let Some(c) = self.peek() {
            let exponent = if hex {
                matches!(c, b'p' | b'P')
            } else {
                matches!(c, b'e' | b'E')
            };
            if exponent {
                self.bump();
                if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                    self.bump();
                }
                seen_exp = true;
                kind = TokenKind::Float;
            } else if c.is_ascii_alphanumeric() || c == b'_' {
                self.bump();
            } else if c == b'.' && !seen_dot && !seen_exp && self.peek_at(1) != Some(b'.') {
                self.bump();
                seen_dot = true;
                kind = TokenKind::Float;
            } else {
                break;
            }
        }
        if self.src[self.pos - 1] == b'i' {
            TokenKind::Imag
        } else {
            kind
        }
    }

    fn scan_escaped(&mut self, quote: u8, line: usize, line_start: usize, what: &str) {
        let start = self.pos;
        self.bump();
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    self.error(start, line, line_start, &format!("{what} literal not terminated"));
                    return;
                }
                Some(b'\\') => {
                    self.bump();
                    if self.peek().is_some_and(|c| c != b'\n') {
                        self.bump();
                    }
                }
                Some(c) => {
                    self.bump();
                    if c == quote {
                        return;
                    }
                }
            }
        }
    }

    fn scan_string(&mut self, line: usize, line_start: usize) {
        self.scan_escaped(b'"', line, line_start, "string");
    }

    fn scan_rune(&mut self, line: usize, line_start: usize) {
        self.scan_escaped(b'\'', line, line_start, "rune");
    }

    fn scan_raw_string(&mut self, line: usize, line_start: usize) {
        let start = self.pos;
        self.bump();
        loop {
            match self.peek() {
                None => {
                    self.error(start, line, line_start, "raw string literal not terminated");
                    return;
                }
                Some(b'`') => {
                    self.bump();
                    return;
                }
                Some(_) => self.bump(),
            }
        }
    }

    fn scan_operator(&mut self) -> Option<TokenKind> {
        const THREE: [&[u8]; 4] = [b"<<=", b">>=", b"&^=", b"..."];
        const TWO: [&[u8]; 20] = [
            b"&&", b"||", b"<-", b"==", b"!=", b"<=", b">=", b":=", b"+=", b"-=", b"*=", b"/=",
            b"%=", b"&=", b"|=", b"^=", b"<<", b">>", b"&^", b"~=",
        ];

        let rest = &self.src[self.pos..];
        if THREE.iter().any(|op| rest.starts_with(op)) {
            self.pos += 3;
            return Some(TokenKind::Operator);
        }
        if rest.starts_with(b"++") || rest.starts_with(b"--") {
            self.pos += 2;
            return Some(if rest[0] == b'+' {
                TokenKind::Inc
            } else {
                TokenKind::Dec
            });
        }
        if TWO.iter().any(|op| rest.starts_with(op)) {
            self.pos += 2;
            return Some(TokenKind::Operator);
        }
        let kind = match rest[0] {
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'[' => TokenKind::LBrack,
            b']' => TokenKind::RBrack,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b'.' => TokenKind::Period,
            b':' => TokenKind::Colon,
            b'+' | b'-' | b'*' | b'/' | b'%' | b'&' | b'|' | b'^' | b'<' | b'>' | b'=' | b'!'
            | b'~' => TokenKind::Operator,
            _ => return None,
        };
        self.pos += 1;
        Some(kind)
    }
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    /// Yields every token up to and including [`TokenKind::Eof`].
    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        let tok = self.next_token();
        if tok.kind == TokenKind::Eof {
            self.done = true;
        }
        Some(tok)
    }
}

/// Letters as the Go scanner sees them; any non-ASCII byte is treated as
/// part of a Unicode identifier.
fn is_letter(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

/// Tokenizes the whole source, failing on the first lexical error.
pub fn tokenize(src: &[u8]) -> Result<Vec<Token>, SyntaxError> {
    let mut scanner = Scanner::new(src);
    let tokens: Vec<Token> = scanner.by_ref().collect();
    match scanner.errors().first() {
        Some(err) => Err(err.clone()),
        None => Ok(tokens),
    }
}
