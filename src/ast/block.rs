//! Block node types.

use serde::{Deserialize, Serialize};

use super::attributes::Attributes;
use super::inline::InlineNode;

/// A structural unit of the document: top-level or nested under a container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    /// Holds inline content on a single line.
    Text(TextBlock),
    /// Holds child blocks, indented or `{...;;...}` on one line.
    Container(ContainerBlock),
    /// Holds raw lines with inline syntax suppressed; written `TYPE!`.
    Raw(RawBlock),
    /// An atomic block, written `{TYPE ...}`.
    Object(BlockObject),
}

impl Block {
    pub fn as_text(&self) -> Option<&TextBlock> {
        match self {
            Block::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_container(&self) -> Option<&ContainerBlock> {
        match self {
            Block::Container(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&RawBlock> {
        match self {
            Block::Raw(r) => Some(r),
            _ => None,
        }
    }

    /// True if this block or any block below it is a raw block. Raw lines
    /// cannot appear on a `;;`-joined line, so the serializer consults this
    /// before honoring the single-line option.
    pub(crate) fn contains_raw(&self) -> bool {
        match self {
            Block::Raw(_) => true,
            Block::Container(c) => c.children.iter().any(Block::contains_raw),
            _ => false,
        }
    }
}

/// A block holding inline content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub name: String,
    pub attrs: Attributes,
    pub children: Vec<InlineNode>,
}

impl TextBlock {
    pub fn new(name: impl Into<String>, children: Vec<InlineNode>) -> Self {
        Self {
            name: name.into(),
            attrs: Attributes::new(),
            children,
        }
    }

    pub fn with_attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }
}

/// A block holding child blocks. Non-empty after a successful parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerBlock {
    pub name: String,
    pub attrs: Attributes,
    pub children: Vec<Block>,
}

impl ContainerBlock {
    pub fn new(name: impl Into<String>, children: Vec<Block>) -> Self {
        Self {
            name: name.into(),
            attrs: Attributes::new(),
            children,
        }
    }

    pub fn with_attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }
}

/// A block of raw lines. The line list may be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBlock {
    pub name: String,
    pub attrs: Attributes,
    pub lines: Vec<String>,
}

impl RawBlock {
    pub fn new(name: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Attributes::new(),
            lines,
        }
    }

    pub fn with_attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }
}

/// An atomic block. Selections address its boundaries with offsets
/// 0 (before) and 1 (after).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockObject {
    pub name: String,
    pub attrs: Attributes,
}

impl BlockObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Attributes::new(),
        }
    }

    pub fn with_attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }
}
