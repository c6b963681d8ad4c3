//! Inline node types: text leaves, marks, and atomic inline objects.

use serde::{Deserialize, Serialize};

use super::attributes::Attributes;

/// A node inside a text block's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InlineNode {
    /// Leaf characters.
    Text(String),
    /// A formatting span wrapping further inline content.
    Mark(Mark),
    /// An atomic inline leaf, e.g. an image or mention.
    Object(InlineObject),
}

impl InlineNode {
    /// Convenience constructor for a text leaf.
    pub fn text(s: impl Into<String>) -> Self {
        InlineNode::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            InlineNode::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_mark(&self) -> Option<&Mark> {
        match self {
            InlineNode::Mark(m) => Some(m),
            _ => None,
        }
    }
}

/// The mode of a mark, selected by the prefix of its opening bracket:
/// none for decorator, `@` for annotation, `~` for overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkMode {
    /// Plain formatting, e.g. strong or emphasis.
    Decorator,
    /// A reference carrying data, e.g. a link.
    Annotation,
    /// Editorial state, e.g. a comment range.
    Overlay,
}

/// An inline range with a type, a mode, and attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    pub name: String,
    pub mode: MarkMode,
    pub attrs: Attributes,
    pub children: Vec<InlineNode>,
}

impl Mark {
    pub fn new(name: impl Into<String>, mode: MarkMode, children: Vec<InlineNode>) -> Self {
        Self {
            name: name.into(),
            mode,
            attrs: Attributes::new(),
            children,
        }
    }

    pub fn with_attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }
}

/// An atomic inline leaf. Selections address its boundaries with offsets
/// 0 (before) and 1 (after); there is no syntax for a point inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineObject {
    pub name: String,
    pub attrs: Attributes,
}

impl InlineObject {
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

/// Concatenated text of all `Text` descendants in order, descending into
/// marks. Objects contribute nothing.
pub fn descendant_text(children: &[InlineNode]) -> String {
    let mut out = String::new();
    collect_text(children, &mut out);
    out
}

fn collect_text(children: &[InlineNode], out: &mut String) {
    for child in children {
        match child {
            InlineNode::Text(t) => out.push_str(t),
            InlineNode::Mark(m) => collect_text(&m.children, out),
            InlineNode::Object(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descendant_text_descends_into_marks() {
        let children = vec![
            InlineNode::text("a "),
            InlineNode::Mark(Mark::new(
                "strong",
                MarkMode::Decorator,
                vec![
                    InlineNode::text("b"),
                    InlineNode::Object(InlineObject::new("img")),
                    InlineNode::text("c"),
                ],
            )),
            InlineNode::text(" d"),
        ];
        assert_eq!(descendant_text(&children), "a bc d");
    }
}
