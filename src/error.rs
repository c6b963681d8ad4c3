//! Error types for parsing statext notation.
//!
//!     Every failure carries a stable machine-readable code plus the 1-based
//!     line and column of the offending token. Parsing aborts at the first
//!     error; no recovery is attempted.

use std::fmt;
use thiserror::Error;

/// Stable error codes surfaced by the lexer and parser.
///
/// The identifier returned by [`ErrorCode::as_str`] is part of the public
/// contract and never changes; the human-readable `detail` on
/// [`ParseError`] may.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Indentation
    TabsInIndentation,
    IndentationNotMultipleOfTwo,
    IndentationSkipsLevel,
    // Selection
    MultipleFocus,
    MultipleAnchor,
    // Delimiters
    UnbalancedBracket,
    UnbalancedBrace,
    MissingColonInMark,
    // Structure
    InvalidChildUnderTextBlock,
    EmptyContainer,
    EmptyDocument,
    MissingSpaceAfterColon,
    // Attributes
    MalformedAttribute,
    UnclosedQuote,
    InvalidJson,
    // Identifiers
    InvalidIdentifier,
    // Escapes
    InvalidEscapeSequence,
}

impl ErrorCode {
    /// The stable identifier for this code.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::TabsInIndentation => "TabsInIndentation",
            ErrorCode::IndentationNotMultipleOfTwo => "IndentationNotMultipleOfTwo",
            ErrorCode::IndentationSkipsLevel => "IndentationSkipsLevel",
            ErrorCode::MultipleFocus => "MultipleFocus",
            ErrorCode::MultipleAnchor => "MultipleAnchor",
            ErrorCode::UnbalancedBracket => "UnbalancedBracket",
            ErrorCode::UnbalancedBrace => "UnbalancedBrace",
            ErrorCode::MissingColonInMark => "MissingColonInMark",
            ErrorCode::InvalidChildUnderTextBlock => "InvalidChildUnderTextBlock",
            ErrorCode::EmptyContainer => "EmptyContainer",
            ErrorCode::EmptyDocument => "EmptyDocument",
            ErrorCode::MissingSpaceAfterColon => "MissingSpaceAfterColon",
            ErrorCode::MalformedAttribute => "MalformedAttribute",
            ErrorCode::UnclosedQuote => "UnclosedQuote",
            ErrorCode::InvalidJson => "InvalidJson",
            ErrorCode::InvalidIdentifier => "InvalidIdentifier",
            ErrorCode::InvalidEscapeSequence => "InvalidEscapeSequence",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parse failure with its source position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code} at line {line}, column {column}{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
pub struct ParseError {
    /// Stable error code, see [`ErrorCode`].
    pub code: ErrorCode,
    /// 1-based source line of the offending token.
    pub line: usize,
    /// 1-based source column of the offending token.
    pub column: usize,
    /// Optional free-form context for humans; not part of the stable contract.
    pub detail: Option<String>,
}

impl ParseError {
    pub fn new(code: ErrorCode, line: usize, column: usize) -> Self {
        Self {
            code,
            line,
            column,
            detail: None,
        }
    }

    /// Attach a human-readable detail string.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Convenience Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable_identifiers() {
        assert_eq!(ErrorCode::TabsInIndentation.as_str(), "TabsInIndentation");
        assert_eq!(ErrorCode::MultipleFocus.to_string(), "MultipleFocus");
    }

    #[test]
    fn display_includes_position_and_detail() {
        let err = ParseError::new(ErrorCode::UnclosedQuote, 3, 14).with_detail("in attribute value");
        assert_eq!(
            err.to_string(),
            "UnclosedQuote at line 3, column 14: in attribute value"
        );
        let bare = ParseError::new(ErrorCode::EmptyDocument, 1, 1);
        assert_eq!(bare.to_string(), "EmptyDocument at line 1, column 1");
    }
}
