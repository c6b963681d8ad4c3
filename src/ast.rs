//! AST node types for editor states.
//!
//!     The document is a tree of block nodes; text carries the characters.
//!     A parsed tree is immutable: the serializer and the matcher only read
//!     it. Selection endpoints address boundaries inside the tree by
//!     child-index path plus an offset (see [selection]).
//!
//!     All offsets in this crate are counted in UTF-16 code units, the width
//!     of a JavaScript `string.length`, so selections interoperate with
//!     editor runtimes that use that unit. A character outside the Basic
//!     Multilingual Plane therefore contributes 2 to any offset.

pub mod attributes;
pub mod block;
pub mod document;
pub mod inline;
pub mod selection;

pub use attributes::{AttrValue, Attributes};
pub use block::{Block, BlockObject, ContainerBlock, RawBlock, TextBlock};
pub use document::EditorState;
pub use inline::{InlineNode, InlineObject, Mark, MarkMode};
pub use selection::{Point, Selection};

/// Length of `s` in UTF-16 code units.
pub(crate) fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// `base` extended with one more child index.
pub(crate) fn path_plus(base: &[usize], index: usize) -> Vec<usize> {
    let mut path = base.to_vec();
    path.push(index);
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf16_len_counts_code_units() {
        assert_eq!(utf16_len(""), 0);
        assert_eq!(utf16_len("const"), 5);
        // U+1F600 is a surrogate pair in UTF-16
        assert_eq!(utf16_len("a\u{1F600}b"), 4);
    }
}
