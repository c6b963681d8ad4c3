//! # statext
//!
//!     A human-readable textual notation for rich-text editor states. The
//!     notation encodes a tree of block and inline nodes, their typed
//!     attributes, and a cursor or range selection within that tree as a
//!     single flat string, which makes editor states diffable in tests and
//!     specifications.
//!
//! Overview
//!
//!     A document is a sequence of blocks. Text blocks hold inline content,
//!     containers hold indented child blocks, raw blocks (`TYPE!`) hold
//!     verbatim lines, and `{TYPE}` blocks are atomic objects. Inline
//!     content mixes text, `[mark:...]` spans, and `{object}` leaves.
//!     Two free-floating markers, `^` (anchor) and `|` (focus), embed the
//!     selection directly in the content:
//!
//!         UL:
//!           LI: foo
//!           LI: [strong:ba^r] baz|
//!
//!     Selection offsets are UTF-16 code units for compatibility with
//!     editor runtimes measuring in `string.length`.
//!
//! Pipeline
//!
//!     1. **Lexing** - a mode-switched pull scanner with off-side
//!        indentation tracking; see [lexing].
//!     2. **Parsing** - recursive descent that snapshots selection markers
//!        into tree coordinates in the same pass; see [parsing].
//!     3. **Serializing** - the canonical, re-parseable rendition of a
//!        state; see [serializing].
//!     4. **Matching** - locate a notation fragment inside a document and
//!        get back a selection; see [matching].
//!
//! Getting Started
//!
//!     - [parse] turns notation into an [EditorState] or a [ParseError]
//!       with a stable code and 1-based position.
//!     - [serialize] renders a state canonically; [SerializeOptions]
//!       selects the single-line form.
//!     - [get_range], [get_point_before], and [get_point_after] search a
//!       document for a pattern fragment.

#![allow(rustdoc::invalid_html_tags)]

pub mod ast;
pub mod error;
pub mod lexing;
pub mod matching;
pub mod parsing;
pub mod serializing;

pub use ast::{
    AttrValue, Attributes, Block, BlockObject, ContainerBlock, EditorState, InlineNode,
    InlineObject, Mark, MarkMode, Point, RawBlock, Selection, TextBlock,
};
pub use error::{ErrorCode, ParseError, Result};
pub use matching::{get_point_after, get_point_before, get_range};
pub use parsing::parse;
pub use serializing::{serialize, SerializeOptions};
