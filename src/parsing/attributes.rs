//! Attribute parsing: `(SPACE IDENT '=' value)*`.
//!
//!     Values are dispatched on the token the lexer produced under
//!     `expect_attr_value`. JSON substrings go straight to serde_json;
//!     nothing in this crate interprets JSON itself. Duplicate keys are
//!     legal in the input; the last write wins.

use crate::ast::{AttrValue, Attributes};
use crate::error::{ErrorCode, ParseError, Result};
use crate::lexing::TokenKind;

use super::parser::Parser;

impl Parser {
    pub(crate) fn parse_attrs(&mut self) -> Result<Attributes> {
        let mut attrs = Attributes::new();
        loop {
            if self.peek()?.kind != TokenKind::Space {
                return Ok(attrs);
            }
            // the flag must be up before the key is scanned; SPACE does not
            // consume it
            self.lexer.expect_ident = true;
            self.next()?; // the space
            let key_token = self.next()?;
            let key = match key_token.kind {
                TokenKind::Ident(name) => name,
                _ => {
                    return Err(ParseError::new(
                        ErrorCode::MalformedAttribute,
                        key_token.line,
                        key_token.column,
                    )
                    .with_detail("expected attribute name"));
                }
            };
            let eq = self.next()?;
            if eq.kind != TokenKind::Equals {
                return Err(ParseError::new(
                    ErrorCode::MalformedAttribute,
                    eq.line,
                    eq.column,
                )
                .with_detail("expected '=' after attribute name"));
            }
            self.lexer.expect_attr_value = true;
            let value_token = self.next()?;
            let value = match value_token.kind {
                TokenKind::Json(raw) => serde_json::from_str(&raw).map_err(|e| {
                    ParseError::new(
                        ErrorCode::InvalidJson,
                        value_token.line,
                        value_token.column,
                    )
                    .with_detail(e.to_string())
                })?,
                TokenKind::String(s) => AttrValue::String(s),
                TokenKind::Number(digits) => {
                    let n: i64 = digits.parse().map_err(|_| {
                        ParseError::new(
                            ErrorCode::MalformedAttribute,
                            value_token.line,
                            value_token.column,
                        )
                        .with_detail("integer out of range")
                    })?;
                    AttrValue::from(n)
                }
                TokenKind::Boolean(b) => AttrValue::Bool(b),
                TokenKind::Ident(s) => AttrValue::String(s),
                _ => {
                    return Err(ParseError::new(
                        ErrorCode::MalformedAttribute,
                        value_token.line,
                        value_token.column,
                    )
                    .with_detail("expected attribute value"));
                }
            };
            attrs.insert(key, value);
        }
    }
}
