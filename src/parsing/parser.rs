//! Document and block-level parsing.

use crate::ast::{
    path_plus, utf16_len, Attributes, Block, BlockObject, ContainerBlock, EditorState, Point,
    RawBlock, Selection, TextBlock,
};
use crate::error::{ErrorCode, ParseError, Result};
use crate::lexing::{Lexer, Token, TokenKind};

/// Parse a notation document into an [`EditorState`].
pub fn parse(input: &str) -> Result<EditorState> {
    Parser::new(input).parse_document()
}

/// Recursive-descent parser with selection capture.
pub struct Parser {
    pub(crate) lexer: Lexer,
    peeked: Option<Token>,
    peeked2: Option<Token>,
    pub(crate) anchor: Option<Point>,
    pub(crate) focus: Option<Point>,
}

impl Parser {
    pub fn new(input: &str) -> Self {
        Self {
            lexer: Lexer::new(input),
            peeked: None,
            peeked2: None,
            anchor: None,
            focus: None,
        }
    }

    pub fn parse_document(&mut self) -> Result<EditorState> {
        self.skip_blanks()?;
        let first = self.peek()?;
        if first.kind == TokenKind::Eof {
            return Err(ParseError::new(
                ErrorCode::EmptyDocument,
                first.line,
                first.column,
            ));
        }
        let mut blocks = Vec::new();
        loop {
            let path = vec![blocks.len()];
            blocks.push(self.parse_block(&path)?);
            self.skip_blanks()?;
            if self.peek()?.kind == TokenKind::Eof {
                break;
            }
        }
        let selection = match (self.anchor.take(), self.focus.take()) {
            (None, None) => None,
            (None, Some(focus)) => Some(Selection::collapsed(focus)),
            (Some(anchor), None) => Some(Selection::collapsed(anchor)),
            (Some(anchor), Some(focus)) => Some(Selection::new(anchor, focus)),
        };
        Ok(EditorState { blocks, selection })
    }

    // ----- blocks -----

    /// Parse one block whose path in the tree is `path`.
    pub(crate) fn parse_block(&mut self, path: &[usize]) -> Result<Block> {
        // selection markers at block level bracket a block object
        let mut saw_marker = false;
        loop {
            let t = self.peek()?;
            match t.kind {
                TokenKind::Anchor => {
                    self.next()?;
                    self.record_anchor(Point::new(path.to_vec(), 0), &t)?;
                    saw_marker = true;
                }
                TokenKind::Focus => {
                    self.next()?;
                    self.record_focus(Point::new(path.to_vec(), 0), &t)?;
                    saw_marker = true;
                }
                _ => break,
            }
        }
        let t = self.peek()?;
        match t.kind {
            TokenKind::LBrace => {
                let object = self.parse_block_object()?;
                loop {
                    let t = self.peek()?;
                    match t.kind {
                        TokenKind::Anchor => {
                            self.next()?;
                            self.record_anchor(Point::new(path.to_vec(), 1), &t)?;
                        }
                        TokenKind::Focus => {
                            self.next()?;
                            self.record_focus(Point::new(path.to_vec(), 1), &t)?;
                        }
                        _ => break,
                    }
                }
                Ok(Block::Object(object))
            }
            TokenKind::Ident(_) if !saw_marker => self.parse_named_block(path),
            TokenKind::RBracket => Err(ParseError::new(
                ErrorCode::UnbalancedBracket,
                t.line,
                t.column,
            )
            .with_detail("unmatched ']'")),
            TokenKind::RBrace => {
                Err(ParseError::new(ErrorCode::UnbalancedBrace, t.line, t.column)
                    .with_detail("unmatched '}'"))
            }
            _ => {
                let detail = if saw_marker {
                    "expected a block object after a block-level selection marker"
                } else {
                    "expected a block"
                };
                Err(ParseError::new(ErrorCode::InvalidIdentifier, t.line, t.column)
                    .with_detail(detail))
            }
        }
    }

    fn parse_block_object(&mut self) -> Result<BlockObject> {
        let (name, attrs) = self.parse_object_body()?;
        Ok(BlockObject { name, attrs })
    }

    /// `{ IDENT attrs }` shared by block and inline objects. The opening
    /// brace is still in the stream.
    pub(crate) fn parse_object_body(&mut self) -> Result<(String, Attributes)> {
        self.next()?; // '{'
        self.lexer.expect_ident = true;
        let name = self.expect_ident_token()?;
        let attrs = self.parse_attrs()?;
        let t = self.next()?;
        if t.kind != TokenKind::RBrace {
            return Err(ParseError::new(ErrorCode::UnbalancedBrace, t.line, t.column)
                .with_detail("expected '}'"));
        }
        Ok((name, attrs))
    }

    fn parse_named_block(&mut self, path: &[usize]) -> Result<Block> {
        let name = self.expect_ident_token()?;
        if self.peek()?.kind == TokenKind::Bang {
            self.next()?;
            let attrs = self.parse_attrs()?;
            self.expect_block_colon()?;
            return self.parse_raw_block(name, attrs, path);
        }
        let attrs = self.parse_attrs()?;
        self.expect_block_colon()?;
        let t = self.peek()?;
        match t.kind {
            TokenKind::Newline | TokenKind::Eof | TokenKind::Dedent => {
                self.parse_container_multiline(name, attrs, path)
            }
            TokenKind::LBrace => self.parse_container_singleline(name, attrs, path),
            TokenKind::Space => {
                self.next()?; // the syntactic space; further spaces are content
                self.parse_text_block(name, attrs, path)
            }
            _ => Err(ParseError::new(
                ErrorCode::MissingSpaceAfterColon,
                t.line,
                t.column,
            )),
        }
    }

    fn parse_text_block(&mut self, name: String, attrs: Attributes, path: &[usize]) -> Result<Block> {
        let children = self.parse_inline_content(path)?;
        if self.peek()?.kind == TokenKind::Newline {
            let t2 = self.peek2()?;
            if t2.kind == TokenKind::Indent {
                return Err(ParseError::new(
                    ErrorCode::InvalidChildUnderTextBlock,
                    t2.line,
                    t2.column,
                ));
            }
        }
        Ok(Block::Text(TextBlock {
            name,
            attrs,
            children,
        }))
    }

    fn parse_container_multiline(
        &mut self,
        name: String,
        attrs: Attributes,
        path: &[usize],
    ) -> Result<Block> {
        self.skip_newlines()?;
        let t = self.peek()?;
        if t.kind != TokenKind::Indent {
            return Err(ParseError::new(ErrorCode::EmptyContainer, t.line, t.column));
        }
        self.next()?; // INDENT
        let mut children = Vec::new();
        loop {
            self.skip_blanks()?;
            let t = self.peek()?;
            match t.kind {
                TokenKind::Dedent => {
                    self.next()?;
                    break;
                }
                TokenKind::Eof => break,
                _ => {
                    let child_path = path_plus(path, children.len());
                    children.push(self.parse_block(&child_path)?);
                }
            }
        }
        if children.is_empty() {
            let t = self.peek()?;
            return Err(ParseError::new(ErrorCode::EmptyContainer, t.line, t.column));
        }
        Ok(Block::Container(ContainerBlock {
            name,
            attrs,
            children,
        }))
    }

    fn parse_container_singleline(
        &mut self,
        name: String,
        attrs: Attributes,
        path: &[usize],
    ) -> Result<Block> {
        self.next()?; // '{'
        self.lexer.expect_ident = true;
        let mut children = Vec::new();
        loop {
            let t = self.peek()?;
            if t.kind == TokenKind::RBrace {
                self.next()?;
                if children.is_empty() {
                    return Err(ParseError::new(ErrorCode::EmptyContainer, t.line, t.column));
                }
                break;
            }
            let child_path = path_plus(path, children.len());
            children.push(self.parse_block(&child_path)?);
            let t = self.peek()?;
            match t.kind {
                TokenKind::BlockSep => {
                    self.next()?;
                }
                TokenKind::RBrace => {}
                _ => {
                    return Err(ParseError::new(
                        ErrorCode::UnbalancedBrace,
                        t.line,
                        t.column,
                    )
                    .with_detail("expected ';;' or '}' in container"));
                }
            }
        }
        Ok(Block::Container(ContainerBlock {
            name,
            attrs,
            children,
        }))
    }

    fn parse_raw_block(&mut self, name: String, attrs: Attributes, path: &[usize]) -> Result<Block> {
        self.lexer.raw_pending = true;
        self.skip_newlines()?;
        if self.peek()?.kind != TokenKind::Indent {
            self.lexer.raw_pending = false;
            return Ok(Block::Raw(RawBlock {
                name,
                attrs,
                lines: Vec::new(),
            }));
        }
        self.next()?; // INDENT; the lexer switched itself into raw mode
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut units = 0usize;
        loop {
            let t = self.next()?;
            match t.kind {
                TokenKind::Text(s) => {
                    units += utf16_len(&s);
                    current.push_str(&s);
                }
                TokenKind::Anchor => {
                    let point = Point::new(path_plus(path, lines.len()), units);
                    self.record_anchor(point, &t)?;
                }
                TokenKind::Focus => {
                    let point = Point::new(path_plus(path, lines.len()), units);
                    self.record_focus(point, &t)?;
                }
                TokenKind::Newline => {
                    lines.push(std::mem::take(&mut current));
                    units = 0;
                }
                TokenKind::Dedent | TokenKind::Eof => {
                    if !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                    }
                    break;
                }
                other => {
                    if let Some(v) = other.text_value() {
                        units += utf16_len(v);
                        current.push_str(v);
                    }
                }
            }
        }
        self.lexer.raw_mode = false;
        Ok(Block::Raw(RawBlock { name, attrs, lines }))
    }

    // ----- selection bookkeeping -----

    pub(crate) fn record_anchor(&mut self, point: Point, token: &Token) -> Result<()> {
        if self.anchor.is_some() {
            return Err(ParseError::new(
                ErrorCode::MultipleAnchor,
                token.line,
                token.column,
            ));
        }
        self.anchor = Some(point);
        Ok(())
    }

    pub(crate) fn record_focus(&mut self, point: Point, token: &Token) -> Result<()> {
        if self.focus.is_some() {
            return Err(ParseError::new(
                ErrorCode::MultipleFocus,
                token.line,
                token.column,
            ));
        }
        self.focus = Some(point);
        Ok(())
    }

    // ----- token plumbing -----

    pub(crate) fn next(&mut self) -> Result<Token> {
        if let Some(token) = self.peeked.take() {
            self.peeked = self.peeked2.take();
            return Ok(token);
        }
        self.lexer.next_token()
    }

    /// Clone of the next token without consuming it.
    pub(crate) fn peek(&mut self) -> Result<Token> {
        if let Some(token) = &self.peeked {
            return Ok(token.clone());
        }
        let token = self.lexer.next_token()?;
        self.peeked = Some(token.clone());
        Ok(token)
    }

    /// Clone of the token after the next one. Used only to look across the
    /// newline that terminates a text block.
    pub(crate) fn peek2(&mut self) -> Result<Token> {
        self.peek()?;
        if let Some(token) = &self.peeked2 {
            return Ok(token.clone());
        }
        let token = self.lexer.next_token()?;
        self.peeked2 = Some(token.clone());
        Ok(token)
    }

    pub(crate) fn expect_ident_token(&mut self) -> Result<String> {
        let t = self.next()?;
        match t.kind {
            TokenKind::Ident(name) => Ok(name),
            _ => Err(ParseError::new(
                ErrorCode::InvalidIdentifier,
                t.line,
                t.column,
            )),
        }
    }

    /// The colon that closes a block header.
    fn expect_block_colon(&mut self) -> Result<()> {
        let t = self.next()?;
        if t.kind != TokenKind::Colon {
            return Err(
                ParseError::new(ErrorCode::MalformedAttribute, t.line, t.column)
                    .with_detail("expected ':' after block type"),
            );
        }
        Ok(())
    }

    fn skip_blanks(&mut self) -> Result<()> {
        loop {
            match self.peek()?.kind {
                TokenKind::Newline | TokenKind::BlockSep => {
                    self.next()?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_newlines(&mut self) -> Result<()> {
        while self.peek()?.kind == TokenKind::Newline {
            self.next()?;
        }
        Ok(())
    }
}

