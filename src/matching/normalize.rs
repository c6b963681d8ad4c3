//! Pattern normalization.
//!
//!     A pattern that already reads as block syntax parses as-is; anything
//!     else is wrapped into a throwaway text block so plain fragments like
//!     `foo` or `[strong:bar]` stay convenient to write.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::Block;
use crate::parsing::parse;

/// An uppercase-initial type name, optionally raw (`!`), followed by `:`.
static BLOCK_HEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z0-9_-]*!?:").expect("block head pattern is valid"));

/// True when the pattern carries block syntax of its own: a block head
/// like `QUOTE:` / `CODE!:`, or a `{TYPE ...}` block object with no colon
/// anywhere.
pub(crate) fn has_block_syntax(pattern: &str) -> bool {
    if BLOCK_HEAD.is_match(pattern) {
        return true;
    }
    if let Some(rest) = pattern.strip_prefix('{') {
        return rest.starts_with(|c: char| c.is_ascii_uppercase()) && !pattern.contains(':');
    }
    false
}

/// Parse a pattern through the document front-end. Returns `None` instead
/// of an error when the pattern is not valid notation.
pub(crate) fn normalize(pattern: &str) -> Option<Vec<Block>> {
    let source = if has_block_syntax(pattern) {
        pattern.to_string()
    } else {
        format!("P: {pattern}")
    };
    parse(&source).ok().map(|state| state.blocks)
}
