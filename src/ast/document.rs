//! The document root.

use serde::{Deserialize, Serialize};

use super::block::Block;
use super::selection::Selection;

/// A complete editor state: the block tree plus an optional selection.
///
/// Structural equality (`==`) covers the selection, so round-trip tests can
/// compare whole states directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorState {
    pub blocks: Vec<Block>,
    pub selection: Option<Selection>,
}

impl EditorState {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            selection: None,
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    /// True if any block in the tree is a raw block.
    pub(crate) fn contains_raw(&self) -> bool {
        self.blocks.iter().any(Block::contains_raw)
    }
}
