//! Lexing: character stream to token stream.
//!
//!     The lexer is a pull scanner with three context flags set by the
//!     parser (`expect_ident`, `expect_attr_value`, `raw_pending`). The
//!     grammar is context-sensitive at the character level: a letter starts
//!     an identifier only where the parser expects one, and inside a raw
//!     block almost every character is plain text. The flags are the
//!     practical alternative to backtracking; each grammar position
//!     uniquely determines their value at that moment.
//!
//!     Indentation is off-side: the lexer keeps a stack of established
//!     widths and synthesizes INDENT/DEDENT tokens at line starts, queuing
//!     extra dedents when a line closes several levels at once. Blank lines
//!     never touch the stack.

pub mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenKind};
