//! Inline content parsing: text runs, marks, objects, selection markers.
//!
//!     The loop keeps a text accumulator and the running child list. A
//!     selection marker snapshots the would-be index of the pending text
//!     (`children.len()`) plus the accumulated UTF-16 length, which is
//!     exactly the tree coordinate the serializer will test when writing
//!     the marker back out.

use crate::ast::{path_plus, utf16_len, InlineNode, InlineObject, Mark, MarkMode, Point};
use crate::error::{ErrorCode, ParseError, Result};
use crate::lexing::TokenKind;

use super::parser::Parser;

impl Parser {
    /// Parse inline content until a terminator (NEWLINE, EOF, `]`, `}`,
    /// DEDENT, or `;;`), which is left in the stream for the caller.
    pub(crate) fn parse_inline_content(&mut self, base: &[usize]) -> Result<Vec<InlineNode>> {
        let mut children: Vec<InlineNode> = Vec::new();
        let mut text = String::new();
        let mut units = 0usize;
        loop {
            let t = self.peek()?;
            match t.kind {
                TokenKind::Newline
                | TokenKind::Eof
                | TokenKind::RBracket
                | TokenKind::RBrace
                | TokenKind::Dedent
                | TokenKind::Indent
                | TokenKind::BlockSep => break,
                TokenKind::Anchor => {
                    self.next()?;
                    let point = Point::new(path_plus(base, children.len()), units);
                    self.record_anchor(point, &t)?;
                }
                TokenKind::Focus => {
                    self.next()?;
                    let point = Point::new(path_plus(base, children.len()), units);
                    self.record_focus(point, &t)?;
                }
                TokenKind::LBracket => {
                    flush_text(&mut children, &mut text, &mut units);
                    let mark_path = path_plus(base, children.len());
                    let mark = self.parse_mark(&mark_path)?;
                    children.push(InlineNode::Mark(mark));
                }
                TokenKind::LBrace => {
                    flush_text(&mut children, &mut text, &mut units);
                    let object = self.parse_inline_object()?;
                    children.push(InlineNode::Object(object));
                }
                _ => {
                    let t = self.next()?;
                    if let Some(v) = t.kind.text_value() {
                        units += utf16_len(v);
                        text.push_str(v);
                    }
                }
            }
        }
        flush_text(&mut children, &mut text, &mut units);
        coalesce_text(&mut children);
        Ok(children)
    }

    /// `[` (`@`|`~`)? IDENT attrs `:` inline_content `]`
    fn parse_mark(&mut self, mark_path: &[usize]) -> Result<Mark> {
        self.next()?; // '['
        self.lexer.expect_ident = true;
        let t = self.next()?;
        let (mode, name) = match t.kind {
            TokenKind::At => {
                self.lexer.expect_ident = true;
                (MarkMode::Annotation, self.expect_ident_token()?)
            }
            TokenKind::Tilde => {
                self.lexer.expect_ident = true;
                (MarkMode::Overlay, self.expect_ident_token()?)
            }
            TokenKind::Ident(name) => (MarkMode::Decorator, name),
            _ => {
                return Err(ParseError::new(
                    ErrorCode::InvalidIdentifier,
                    t.line,
                    t.column,
                )
                .with_detail("expected mark type"));
            }
        };
        let attrs = self.parse_attrs()?;
        let t = self.next()?;
        if t.kind != TokenKind::Colon {
            return Err(ParseError::new(
                ErrorCode::MissingColonInMark,
                t.line,
                t.column,
            ));
        }
        let children = self.parse_inline_content(mark_path)?;
        let t = self.next()?;
        if t.kind != TokenKind::RBracket {
            return Err(ParseError::new(
                ErrorCode::UnbalancedBracket,
                t.line,
                t.column,
            )
            .with_detail("expected ']'"));
        }
        Ok(Mark {
            name,
            mode,
            attrs,
            children,
        })
    }

    fn parse_inline_object(&mut self) -> Result<InlineObject> {
        let (name, attrs) = self.parse_object_body()?;
        Ok(InlineObject { name, attrs })
    }
}

fn flush_text(children: &mut Vec<InlineNode>, text: &mut String, units: &mut usize) {
    if !text.is_empty() {
        children.push(InlineNode::Text(std::mem::take(text)));
    }
    *units = 0;
}

/// Merge adjacent text leaves into one.
fn coalesce_text(children: &mut Vec<InlineNode>) {
    let mut i = 1;
    while i < children.len() {
        if let (InlineNode::Text(_), InlineNode::Text(_)) = (&children[i - 1], &children[i]) {
            if let InlineNode::Text(tail) = children.remove(i) {
                if let InlineNode::Text(head) = &mut children[i - 1] {
                    head.push_str(&tail);
                }
            }
        } else {
            i += 1;
        }
    }
}
