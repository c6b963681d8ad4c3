//! Serializing: editor state to canonical notation.
//!
//!     The serializer is the mirror of the parser: it walks the tree with a
//!     live path and tests every candidate boundary against the selection,
//!     writing `^` and `|` where an endpoint matches. Re-parsing the output
//!     yields a structurally identical tree and selection.

pub mod serializer;

pub use serializer::{serialize, SerializeOptions};
