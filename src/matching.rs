//! Matching: locate a notation fragment inside a document.
//!
//!     A pattern goes through the same front-end as a document, then a
//!     structural/textual search runs over the tree. Attribute omission in
//!     the pattern matches any value; the leftmost occurrence wins.

pub mod matcher;
pub mod normalize;

pub use matcher::{get_point_after, get_point_before, get_range};
