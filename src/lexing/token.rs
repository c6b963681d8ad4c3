//! Token types shared by the lexer and parser.

use std::fmt;

/// A token kind, with the decoded payload where one exists.
///
/// `Text` carries escape-resolved characters; `String` carries the decoded
/// string content without its quotes; `Json` carries the raw balanced
/// substring for a standard JSON decoder to handle.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Newline,
    /// Synthetic: one new indentation level was established.
    Indent,
    /// Synthetic: one indentation level was closed.
    Dedent,
    /// `;;`
    BlockSep,
    Eof,
    Colon,
    Bang,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    /// `|`
    Focus,
    /// `^`
    Anchor,
    At,
    Tilde,
    Equals,
    /// A single space outside indentation.
    Space,
    Ident(String),
    Text(String),
    String(String),
    Number(String),
    Boolean(bool),
    Json(String),
}

impl TokenKind {
    /// The characters this token contributes when it appears inside inline
    /// content. Structural tokens contribute nothing.
    pub fn text_value(&self) -> Option<&str> {
        match self {
            TokenKind::Colon => Some(":"),
            TokenKind::Bang => Some("!"),
            TokenKind::At => Some("@"),
            TokenKind::Tilde => Some("~"),
            TokenKind::Equals => Some("="),
            TokenKind::Space => Some(" "),
            TokenKind::Ident(s)
            | TokenKind::Text(s)
            | TokenKind::String(s)
            | TokenKind::Number(s)
            | TokenKind::Json(s) => Some(s),
            TokenKind::Boolean(true) => Some("true"),
            TokenKind::Boolean(false) => Some("false"),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Newline => "NEWLINE",
            TokenKind::Indent => "INDENT",
            TokenKind::Dedent => "DEDENT",
            TokenKind::BlockSep => "BLOCK_SEP",
            TokenKind::Eof => "EOF",
            TokenKind::Colon => "COLON",
            TokenKind::Bang => "BANG",
            TokenKind::LBracket => "LBRACKET",
            TokenKind::RBracket => "RBRACKET",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::Focus => "FOCUS",
            TokenKind::Anchor => "ANCHOR",
            TokenKind::At => "AT",
            TokenKind::Tilde => "TILDE",
            TokenKind::Equals => "EQUALS",
            TokenKind::Space => "SPACE",
            TokenKind::Ident(_) => "IDENT",
            TokenKind::Text(_) => "TEXT",
            TokenKind::String(_) => "STRING",
            TokenKind::Number(_) => "NUMBER",
            TokenKind::Boolean(_) => "BOOLEAN",
            TokenKind::Json(_) => "JSON",
        };
        f.write_str(name)
    }
}

/// A token with the 1-based position of its first character. Synthetic
/// tokens (INDENT, DEDENT, EOF dedents) point at the line start that
/// produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }
}
