//! The pull lexer.
//!
//!     Scans one token per call, tracking 1-based line/column positions and
//!     the off-side indentation stack. CRLF line endings are normalized to
//!     LF up front. The parser owns the context flags; the lexer clears
//!     `expect_ident`/`expect_attr_value` whenever it produces a token other
//!     than SPACE or a structural token, so a flag set before a key or value
//!     survives exactly until that token is scanned.

use crate::error::{ErrorCode, ParseError, Result};
use crate::lexing::token::{Token, TokenKind};

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    /// Established indentation widths in spaces, seeded with 0.
    indent_stack: Vec<usize>,
    /// Dedents still owed after a line closed several levels at once.
    pending_dedents: usize,
    at_line_start: bool,
    /// A letter at the next scan starts an IDENT (or BOOLEAN) instead of TEXT.
    pub(crate) expect_ident: bool,
    /// Set after `=`: digits scan as NUMBER, `{`/`[` as a balanced JSON value.
    pub(crate) expect_attr_value: bool,
    /// Set between a raw block's colon and its INDENT: the next deeper line
    /// establishes the raw level, keeping any further indentation as text.
    pub(crate) raw_pending: bool,
    /// Inside a raw block's body: only `\n`, `|`, `^`, `\|`, `\^` are special.
    pub(crate) raw_mode: bool,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let normalized = input.replace("\r\n", "\n");
        Self {
            chars: normalized.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            indent_stack: vec![0],
            pending_dedents: 0,
            at_line_start: true,
            expect_ident: false,
            expect_attr_value: false,
            raw_pending: false,
            raw_mode: false,
        }
    }

    pub fn next_token(&mut self) -> Result<Token> {
        if self.pending_dedents > 0 {
            self.pending_dedents -= 1;
            return Ok(Token::new(TokenKind::Dedent, self.line, self.column));
        }
        if self.at_line_start && self.pos < self.chars.len() {
            if let Some(token) = self.handle_line_start()? {
                return Ok(self.finish(token));
            }
        }
        if self.pos >= self.chars.len() {
            if self.indent_stack.len() > 1 {
                self.indent_stack.pop();
                self.raw_mode = false;
                return Ok(Token::new(TokenKind::Dedent, self.line, self.column));
            }
            return Ok(self.finish(Token::new(TokenKind::Eof, self.line, self.column)));
        }
        let token = if self.raw_mode {
            self.scan_raw()?
        } else {
            self.scan_normal()?
        };
        Ok(self.finish(token))
    }

    /// Clear or set the context flags according to the token produced.
    /// SPACE and the structural tokens leave them alone so a flag set
    /// before an attribute key survives the key's leading space.
    fn finish(&mut self, token: Token) -> Token {
        match token.kind {
            TokenKind::Space
            | TokenKind::Newline
            | TokenKind::Indent
            | TokenKind::Dedent => {}
            TokenKind::BlockSep => {
                self.expect_ident = true;
                self.expect_attr_value = false;
            }
            _ => {
                self.expect_ident = false;
                self.expect_attr_value = false;
            }
        }
        token
    }

    // ----- line starts and indentation -----

    /// Process the start of a line: skip blank lines, synthesize
    /// INDENT/DEDENT, and establish a raw block's level when one is
    /// pending. Returns `None` when the line continues with ordinary
    /// content at the current level.
    fn handle_line_start(&mut self) -> Result<Option<Token>> {
        if self.raw_mode {
            return self.raw_line_start();
        }
        let line = self.line;

        // blank lines carry no structure, tabs included
        let mut ws = 0;
        while matches!(self.peek_at(ws), Some(' ') | Some('\t')) {
            ws += 1;
        }
        match self.peek_at(ws) {
            None => {
                self.consume_n(ws);
                self.at_line_start = false;
                return Ok(None);
            }
            Some('\n') => {
                self.consume_n(ws);
                let token = Token::new(TokenKind::Newline, self.line, self.column);
                self.advance();
                return Ok(Some(token));
            }
            _ => {}
        }

        let mut width = 0;
        while self.peek_at(width) == Some(' ') {
            width += 1;
        }
        let top = self.indent_stack.last().copied().unwrap_or(0);

        if self.raw_pending && width >= top + 2 {
            // consume exactly the new level; deeper whitespace is line text
            self.consume_n(top + 2);
            self.indent_stack.push(top + 2);
            self.raw_pending = false;
            self.raw_mode = true;
            self.at_line_start = false;
            return Ok(Some(Token::new(TokenKind::Indent, line, 1)));
        }
        if self.peek_at(width) == Some('\t') {
            return Err(ParseError::new(
                ErrorCode::TabsInIndentation,
                line,
                width + 1,
            ));
        }
        if self.raw_pending && width > top {
            return Err(ParseError::new(
                ErrorCode::IndentationNotMultipleOfTwo,
                line,
                width + 1,
            ));
        }
        // raw_pending with no indented body: normal rules resume

        if width % 2 != 0 {
            return Err(ParseError::new(
                ErrorCode::IndentationNotMultipleOfTwo,
                line,
                width + 1,
            ));
        }
        if width > top {
            if width != top + 2 {
                return Err(ParseError::new(
                    ErrorCode::IndentationSkipsLevel,
                    line,
                    width + 1,
                ));
            }
            self.consume_n(width);
            self.indent_stack.push(width);
            self.at_line_start = false;
            self.expect_ident = true;
            return Ok(Some(Token::new(TokenKind::Indent, line, 1)));
        }
        if width < top {
            self.consume_n(width);
            let mut pops = 0;
            while self.indent_stack.last().copied().unwrap_or(0) > width {
                self.indent_stack.pop();
                pops += 1;
            }
            if self.indent_stack.last().copied().unwrap_or(0) != width {
                return Err(ParseError::new(
                    ErrorCode::IndentationNotMultipleOfTwo,
                    line,
                    width + 1,
                )
                .with_detail("dedent to invalid level"));
            }
            self.pending_dedents = pops - 1;
            self.at_line_start = false;
            self.expect_ident = true;
            return Ok(Some(Token::new(TokenKind::Dedent, line, 1)));
        }
        self.consume_n(width);
        self.at_line_start = false;
        self.expect_ident = true;
        Ok(None)
    }

    /// Line start inside a raw body. Consumes at most the raw level's width
    /// of indentation; anything beyond it, spaces and tabs included, stays
    /// in the stream as line text. A shallower non-blank line closes the
    /// raw block.
    fn raw_line_start(&mut self) -> Result<Option<Token>> {
        let line = self.line;

        let mut i = 0;
        while matches!(self.peek_at(i), Some(' ') | Some('\t')) {
            i += 1;
        }
        match self.peek_at(i) {
            None => {
                self.consume_n(i);
                self.at_line_start = false;
                return Ok(None);
            }
            Some('\n') => {
                self.consume_n(i);
                let token = Token::new(TokenKind::Newline, self.line, self.column);
                self.advance();
                return Ok(Some(token));
            }
            _ => {}
        }

        let top = self.indent_stack.last().copied().unwrap_or(0);
        let mut width = 0;
        while width < top && self.peek_char() == Some(' ') {
            self.advance();
            width += 1;
        }
        if width < top {
            if self.peek_char() == Some('\t') {
                return Err(ParseError::new(
                    ErrorCode::TabsInIndentation,
                    line,
                    width + 1,
                ));
            }
            if width % 2 != 0 {
                return Err(ParseError::new(
                    ErrorCode::IndentationNotMultipleOfTwo,
                    line,
                    width + 1,
                ));
            }
            let mut pops = 0;
            while self.indent_stack.last().copied().unwrap_or(0) > width {
                self.indent_stack.pop();
                pops += 1;
            }
            if self.indent_stack.last().copied().unwrap_or(0) != width {
                return Err(ParseError::new(
                    ErrorCode::IndentationNotMultipleOfTwo,
                    line,
                    width + 1,
                )
                .with_detail("dedent to invalid level"));
            }
            self.pending_dedents = pops - 1;
            self.raw_mode = false;
            self.at_line_start = false;
            self.expect_ident = true;
            return Ok(Some(Token::new(TokenKind::Dedent, line, 1)));
        }
        self.at_line_start = false;
        Ok(None)
    }

    // ----- token scanners -----

    fn scan_raw(&mut self) -> Result<Token> {
        let (line, column) = (self.line, self.column);
        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(Token::new(TokenKind::Eof, line, column)),
        };
        let kind = match c {
            '\n' => {
                self.advance();
                self.at_line_start = true;
                TokenKind::Newline
            }
            '|' => {
                self.advance();
                TokenKind::Focus
            }
            '^' => {
                self.advance();
                TokenKind::Anchor
            }
            '\\' => {
                // raw mode has exactly two escapes; any other backslash is text
                self.advance();
                match self.peek_char() {
                    Some('|') => {
                        self.advance();
                        TokenKind::Text("|".to_string())
                    }
                    Some('^') => {
                        self.advance();
                        TokenKind::Text("^".to_string())
                    }
                    _ => TokenKind::Text("\\".to_string()),
                }
            }
            _ => {
                let mut text = String::new();
                while let Some(c) = self.peek_char() {
                    if matches!(c, '\n' | '|' | '^' | '\\') {
                        break;
                    }
                    text.push(c);
                    self.advance();
                }
                TokenKind::Text(text)
            }
        };
        Ok(Token::new(kind, line, column))
    }

    fn scan_normal(&mut self) -> Result<Token> {
        let (line, column) = (self.line, self.column);
        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(Token::new(TokenKind::Eof, line, column)),
        };
        if self.expect_attr_value && (c == '{' || c == '[') {
            return self.scan_json();
        }
        let kind = match c {
            '\n' => {
                self.advance();
                self.at_line_start = true;
                TokenKind::Newline
            }
            ':' => self.single(TokenKind::Colon),
            '!' => self.single(TokenKind::Bang),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '|' => self.single(TokenKind::Focus),
            '^' => self.single(TokenKind::Anchor),
            '@' => self.single(TokenKind::At),
            '~' => self.single(TokenKind::Tilde),
            '=' => self.single(TokenKind::Equals),
            ' ' => self.single(TokenKind::Space),
            '"' => return self.scan_string(),
            ';' if self.peek_at(1) == Some(';') => {
                self.advance();
                self.advance();
                TokenKind::BlockSep
            }
            c if c.is_ascii_digit() && self.expect_attr_value => self.scan_number(),
            c if c.is_ascii_alphabetic() && (self.expect_ident || self.expect_attr_value) => {
                self.scan_ident()
            }
            _ => return self.scan_text(),
        };
        Ok(Token::new(kind, line, column))
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn scan_number(&mut self) -> TokenKind {
        let mut digits = String::new();
        while let Some(c) = self.peek_char() {
            if !c.is_ascii_digit() {
                break;
            }
            digits.push(c);
            self.advance();
        }
        TokenKind::Number(digits)
    }

    fn scan_ident(&mut self) -> TokenKind {
        let mut name = String::new();
        while let Some(c) = self.peek_char() {
            if !(c.is_ascii_alphanumeric() || c == '_' || c == '-') {
                break;
            }
            name.push(c);
            self.advance();
        }
        match name.as_str() {
            "true" => TokenKind::Boolean(true),
            "false" => TokenKind::Boolean(false),
            _ => TokenKind::Ident(name),
        }
    }

    fn scan_text(&mut self) -> Result<Token> {
        let (line, column) = (self.line, self.column);
        let mut text = String::new();
        while let Some(c) = self.peek_char() {
            match c {
                '\n' | '[' | ']' | '{' | '}' | '|' | '^' | '@' | '~' | ':' | '=' | '"' | ' '
                | '!' => break,
                ';' => {
                    if self.peek_at(1) == Some(';') {
                        break;
                    }
                    text.push(';');
                    self.advance();
                }
                '\\' => text.push(self.scan_escape()?),
                _ => {
                    text.push(c);
                    self.advance();
                }
            }
        }
        Ok(Token::new(TokenKind::Text(text), line, column))
    }

    /// Resolve a backslash escape outside raw mode and strings.
    fn scan_escape(&mut self) -> Result<char> {
        let (line, column) = (self.line, self.column);
        self.advance(); // backslash
        let c = match self.peek_char() {
            Some(c) => c,
            None => return Err(ParseError::new(ErrorCode::InvalidEscapeSequence, line, column)),
        };
        self.advance();
        let resolved = match c {
            's' => ' ',
            't' => '\t',
            'n' => '\n',
            'r' => '\r',
            '\\' => '\\',
            '"' => '"',
            '[' => '[',
            ']' => ']',
            '{' => '{',
            '}' => '}',
            '|' => '|',
            '^' => '^',
            ';' => ';',
            'u' => self.scan_unicode_escape(line, column)?,
            other => {
                return Err(
                    ParseError::new(ErrorCode::InvalidEscapeSequence, line, column)
                        .with_detail(format!("\\{other}")),
                );
            }
        };
        Ok(resolved)
    }

    /// Read exactly four hex digits after `\u`. A surrogate pair of escapes
    /// decodes to one scalar; a lone surrogate is an error.
    fn scan_unicode_escape(&mut self, line: usize, column: usize) -> Result<char> {
        let high = self.read_four_hex(line, column)?;
        if (0xDC00..=0xDFFF).contains(&high) {
            return Err(ParseError::new(ErrorCode::InvalidEscapeSequence, line, column)
                .with_detail("lone low surrogate"));
        }
        if (0xD800..=0xDBFF).contains(&high) {
            if self.peek_char() == Some('\\') && self.peek_at(1) == Some('u') {
                self.advance();
                self.advance();
                let low = self.read_four_hex(line, column)?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(ParseError::new(
                        ErrorCode::InvalidEscapeSequence,
                        line,
                        column,
                    )
                    .with_detail("expected low surrogate"));
                }
                let scalar =
                    0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                return char::from_u32(scalar as u32).ok_or_else(|| {
                    ParseError::new(ErrorCode::InvalidEscapeSequence, line, column)
                });
            }
            return Err(ParseError::new(ErrorCode::InvalidEscapeSequence, line, column)
                .with_detail("lone high surrogate"));
        }
        char::from_u32(high as u32)
            .ok_or_else(|| ParseError::new(ErrorCode::InvalidEscapeSequence, line, column))
    }

    fn read_four_hex(&mut self, line: usize, column: usize) -> Result<usize> {
        let mut value = 0usize;
        for _ in 0..4 {
            let digit = self
                .peek_char()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| {
                    ParseError::new(ErrorCode::InvalidEscapeSequence, line, column)
                        .with_detail("expected four hex digits after \\u")
                })?;
            self.advance();
            value = value * 16 + digit as usize;
        }
        Ok(value)
    }

    fn scan_string(&mut self) -> Result<Token> {
        let (line, column) = (self.line, self.column);
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.peek_char() {
                None => {
                    return Err(ParseError::new(
                        ErrorCode::UnclosedQuote,
                        self.line,
                        self.column,
                    ));
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\n') => {
                    return Err(ParseError::new(
                        ErrorCode::UnclosedQuote,
                        self.line,
                        self.column,
                    ));
                }
                Some('\\') => {
                    let (el, ec) = (self.line, self.column);
                    self.advance();
                    let c = match self.peek_char() {
                        Some(c) => c,
                        None => {
                            return Err(ParseError::new(
                                ErrorCode::UnclosedQuote,
                                self.line,
                                self.column,
                            ));
                        }
                    };
                    self.advance();
                    let resolved = match c {
                        '"' => '"',
                        '\\' => '\\',
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        'u' => self.scan_unicode_escape(el, ec)?,
                        other => {
                            return Err(ParseError::new(
                                ErrorCode::InvalidEscapeSequence,
                                el,
                                ec,
                            )
                            .with_detail(format!("\\{other} in string")));
                        }
                    };
                    value.push(resolved);
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }
        Ok(Token::new(TokenKind::String(value), line, column))
    }

    /// Capture a balanced JSON value as a raw substring. Brace/bracket
    /// depth ignores anything inside string literals; the parser hands the
    /// substring to serde_json.
    fn scan_json(&mut self) -> Result<Token> {
        let (line, column) = (self.line, self.column);
        let start = self.pos;
        let mut depth = 0usize;
        loop {
            match self.peek_char() {
                None => {
                    return Err(ParseError::new(ErrorCode::InvalidJson, line, column)
                        .with_detail("unexpected end of input in JSON value"));
                }
                Some('"') => {
                    self.advance();
                    loop {
                        match self.peek_char() {
                            None => {
                                return Err(ParseError::new(
                                    ErrorCode::UnclosedQuote,
                                    self.line,
                                    self.column,
                                ));
                            }
                            Some('\\') => {
                                self.advance();
                                if self.peek_char().is_some() {
                                    self.advance();
                                }
                            }
                            Some('"') => {
                                self.advance();
                                break;
                            }
                            Some(_) => {
                                self.advance();
                            }
                        }
                    }
                }
                Some('{') | Some('[') => {
                    depth += 1;
                    self.advance();
                }
                Some('}') | Some(']') => {
                    depth = depth.saturating_sub(1);
                    self.advance();
                    if depth == 0 {
                        break;
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        let raw: String = self.chars[start..self.pos].iter().collect();
        Ok(Token::new(TokenKind::Json(raw), line, column))
    }

    // ----- character plumbing -----

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn consume_n(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_tokens(input: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(input);
        let mut kinds = Vec::new();
        loop {
            let token = lexer.next_token().expect("lexing failed");
            let done = token.kind == TokenKind::Eof;
            kinds.push(token.kind);
            if done {
                break;
            }
        }
        kinds
    }

    #[test]
    fn tokenizes_a_simple_text_block() {
        assert_eq!(
            all_tokens("P: foo"),
            vec![
                TokenKind::Ident("P".to_string()),
                TokenKind::Colon,
                TokenKind::Space,
                TokenKind::Text("foo".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn synthesizes_indent_and_dedent() {
        assert_eq!(
            all_tokens("UL:\n  LI: a\nP: b"),
            vec![
                TokenKind::Ident("UL".to_string()),
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Indent,
                TokenKind::Ident("LI".to_string()),
                TokenKind::Colon,
                TokenKind::Space,
                TokenKind::Text("a".to_string()),
                TokenKind::Newline,
                TokenKind::Dedent,
                TokenKind::Ident("P".to_string()),
                TokenKind::Colon,
                TokenKind::Space,
                TokenKind::Text("b".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn flushes_dedents_at_eof() {
        let kinds = all_tokens("A:\n  B:\n    C: x");
        let dedents = kinds
            .iter()
            .filter(|k| **k == TokenKind::Dedent)
            .count();
        assert_eq!(dedents, 2);
        assert_eq!(kinds.last(), Some(&TokenKind::Eof));
    }

    #[test]
    fn blank_lines_do_not_dedent() {
        assert_eq!(
            all_tokens("UL:\n  LI: a\n\n  LI: b"),
            vec![
                TokenKind::Ident("UL".to_string()),
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Indent,
                TokenKind::Ident("LI".to_string()),
                TokenKind::Colon,
                TokenKind::Space,
                TokenKind::Text("a".to_string()),
                TokenKind::Newline,
                TokenKind::Newline,
                TokenKind::Ident("LI".to_string()),
                TokenKind::Colon,
                TokenKind::Space,
                TokenKind::Text("b".to_string()),
                TokenKind::Newline,
                TokenKind::Dedent,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn tab_in_indentation_is_an_error() {
        let mut lexer = Lexer::new("UL:\n\tLI: a");
        lexer.next_token().unwrap(); // UL
        lexer.next_token().unwrap(); // :
        lexer.next_token().unwrap(); // newline
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err.code, ErrorCode::TabsInIndentation);
        assert_eq!((err.line, err.column), (2, 1));
    }

    #[test]
    fn skipped_level_is_an_error() {
        let mut lexer = Lexer::new("UL:\n    LI: a");
        lexer.next_token().unwrap();
        lexer.next_token().unwrap();
        lexer.next_token().unwrap();
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err.code, ErrorCode::IndentationSkipsLevel);
        assert_eq!((err.line, err.column), (2, 5));
    }

    #[test]
    fn odd_indentation_is_an_error() {
        let mut lexer = Lexer::new("UL:\n LI: a");
        lexer.next_token().unwrap();
        lexer.next_token().unwrap();
        lexer.next_token().unwrap();
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err.code, ErrorCode::IndentationNotMultipleOfTwo);
    }

    #[test]
    fn escapes_resolve_into_text() {
        assert_eq!(
            all_tokens("P: a\\[b\\]c\\\\d"),
            vec![
                TokenKind::Ident("P".to_string()),
                TokenKind::Colon,
                TokenKind::Space,
                TokenKind::Text("a[b]c\\d".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unicode_escape_reads_four_hex_digits() {
        assert_eq!(
            all_tokens("P: \\u0041"),
            vec![
                TokenKind::Ident("P".to_string()),
                TokenKind::Colon,
                TokenKind::Space,
                TokenKind::Text("A".to_string()),
                TokenKind::Eof,
            ]
        );
        let mut lexer = Lexer::new("P: \\u00");
        lexer.next_token().unwrap();
        lexer.next_token().unwrap();
        lexer.next_token().unwrap();
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidEscapeSequence);
    }

    #[test]
    fn surrogate_pair_escapes_decode_to_one_scalar() {
        assert_eq!(
            all_tokens("P: \\uD83D\\uDE00"),
            vec![
                TokenKind::Ident("P".to_string()),
                TokenKind::Colon,
                TokenKind::Space,
                TokenKind::Text("\u{1F600}".to_string()),
                TokenKind::Eof,
            ]
        );
        let mut lexer = Lexer::new("P: \\uD83Dx");
        lexer.next_token().unwrap();
        lexer.next_token().unwrap();
        lexer.next_token().unwrap();
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidEscapeSequence);
    }

    #[test]
    fn single_semicolon_is_text_double_is_separator() {
        assert_eq!(
            all_tokens("P: a;b"),
            vec![
                TokenKind::Ident("P".to_string()),
                TokenKind::Colon,
                TokenKind::Space,
                TokenKind::Text("a;b".to_string()),
                TokenKind::Eof,
            ]
        );
        let kinds = all_tokens("P: a;;P: b");
        assert!(kinds.contains(&TokenKind::BlockSep));
    }

    #[test]
    fn selection_markers_are_always_tokens() {
        let kinds = all_tokens("P: fo^o|");
        assert!(kinds.contains(&TokenKind::Anchor));
        assert!(kinds.contains(&TokenKind::Focus));
    }

    #[test]
    fn string_token_decodes_escapes() {
        let mut lexer = Lexer::new("\"a\\n\\\"b\"");
        let token = lexer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::String("a\n\"b".to_string()));
    }

    #[test]
    fn unclosed_string_is_an_error() {
        let mut lexer = Lexer::new("\"abc");
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err.code, ErrorCode::UnclosedQuote);
        let mut lexer = Lexer::new("\"abc\ndef\"");
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err.code, ErrorCode::UnclosedQuote);
    }

    #[test]
    fn json_capture_balances_braces_and_honors_strings() {
        let mut lexer = Lexer::new("{\"a\": [1, {\"b\": \"}\"}]} tail");
        lexer.expect_attr_value = true;
        let token = lexer.next_token().unwrap();
        assert_eq!(
            token.kind,
            TokenKind::Json("{\"a\": [1, {\"b\": \"}\"}]}".to_string())
        );
    }

    #[test]
    fn ident_only_scans_when_expected() {
        // at line start the flag is set by the lexer itself
        let mut lexer = Lexer::new("word");
        let token = lexer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::Ident("word".to_string()));
        // mid-content letters are text
        let kinds = all_tokens("P: word");
        assert!(kinds.contains(&TokenKind::Text("word".to_string())));
    }

    #[test]
    fn boolean_recognized_under_expect_ident() {
        let mut lexer = Lexer::new("true");
        let token = lexer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::Boolean(true));
    }

    #[test]
    fn raw_mode_suppresses_structure() {
        let mut lexer = Lexer::new("CODE!:\n  const arr = [1, 2, 3]\n");
        // CODE ! : NEWLINE
        for _ in 0..4 {
            lexer.next_token().unwrap();
        }
        lexer.raw_pending = true;
        let token = lexer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::Indent);
        let token = lexer.next_token().unwrap();
        assert_eq!(
            token.kind,
            TokenKind::Text("const arr = [1, 2, 3]".to_string())
        );
    }

    #[test]
    fn raw_mode_keeps_extra_indentation_as_text() {
        let mut lexer = Lexer::new("CODE!:\n    indented\n");
        for _ in 0..4 {
            lexer.next_token().unwrap();
        }
        lexer.raw_pending = true;
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Indent);
        assert_eq!(
            lexer.next_token().unwrap().kind,
            TokenKind::Text("  indented".to_string())
        );
    }

    #[test]
    fn raw_mode_escapes_only_markers() {
        let mut lexer = Lexer::new("CODE!:\n  a\\|b \\n c\\^\n");
        for _ in 0..4 {
            lexer.next_token().unwrap();
        }
        lexer.raw_pending = true;
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Indent);
        let mut text = String::new();
        loop {
            match lexer.next_token().unwrap().kind {
                TokenKind::Text(s) => text.push_str(&s),
                TokenKind::Newline | TokenKind::Dedent | TokenKind::Eof => break,
                other => panic!("unexpected token {other}"),
            }
        }
        assert_eq!(text, "a|b \\n c^");
    }

    #[test]
    fn crlf_is_normalized() {
        let kinds = all_tokens("P: a\r\nP: b");
        let newlines = kinds.iter().filter(|k| **k == TokenKind::Newline).count();
        assert_eq!(newlines, 1);
    }
}
