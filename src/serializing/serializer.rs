//! The canonical serializer.

use crate::ast::{AttrValue, Attributes, Block, EditorState, InlineNode, MarkMode, Selection};

/// Output form options.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializeOptions {
    /// Join top-level blocks with `;;` and write containers as
    /// `TYPE:{...}` instead of indented lines. Ignored when the state
    /// contains a raw block, whose lines only exist in multiline form.
    pub single_line: bool,
}

/// Serialize a state to its canonical notation. Infallible for any
/// value-valid state; re-parsing the result reproduces the tree and the
/// selection of states that came out of the parser.
pub fn serialize(state: &EditorState, options: SerializeOptions) -> String {
    let single_line = options.single_line && !state.contains_raw();
    let mut serializer = Serializer {
        out: String::new(),
        selection: state.selection.as_ref(),
        single_line,
        path: Vec::new(),
    };
    serializer.run(state);
    serializer.out
}

struct Serializer<'a> {
    out: String,
    selection: Option<&'a Selection>,
    single_line: bool,
    /// Path of the node currently being emitted; candidate positions are
    /// tested against it.
    path: Vec<usize>,
}

impl Serializer<'_> {
    fn run(&mut self, state: &EditorState) {
        for (i, block) in state.blocks.iter().enumerate() {
            if i > 0 {
                self.out.push_str(if self.single_line { ";;" } else { "\n" });
            }
            self.path.push(i);
            self.emit_block(block, 0);
            self.path.pop();
        }
    }

    /// Write any selection marker that falls on `(self.path, offset)`.
    /// A collapsed selection is written as a bare `|`, which re-parses to
    /// collapsed; otherwise the anchor comes first.
    fn markers_at(&mut self, offset: usize) {
        let Some(selection) = self.selection else {
            return;
        };
        if selection.is_collapsed() {
            if selection.focus.is_at(&self.path, offset) {
                self.out.push('|');
            }
            return;
        }
        if selection.anchor.is_at(&self.path, offset) {
            self.out.push('^');
        }
        if selection.focus.is_at(&self.path, offset) {
            self.out.push('|');
        }
    }

    fn emit_block(&mut self, block: &Block, indent: usize) {
        match block {
            Block::Text(text_block) => {
                self.out.push_str(&text_block.name);
                self.emit_attrs(&text_block.attrs);
                self.out.push_str(": ");
                self.emit_inline(&text_block.children);
            }
            Block::Container(container) => {
                self.out.push_str(&container.name);
                self.emit_attrs(&container.attrs);
                self.out.push(':');
                if self.single_line {
                    self.out.push('{');
                    for (j, child) in container.children.iter().enumerate() {
                        if j > 0 {
                            self.out.push_str(";;");
                        }
                        self.path.push(j);
                        self.emit_block(child, indent);
                        self.path.pop();
                    }
                    self.out.push('}');
                } else {
                    for (j, child) in container.children.iter().enumerate() {
                        self.out.push('\n');
                        self.push_indent(indent + 1);
                        self.path.push(j);
                        self.emit_block(child, indent + 1);
                        self.path.pop();
                    }
                }
            }
            Block::Raw(raw) => {
                self.out.push_str(&raw.name);
                self.out.push('!');
                self.emit_attrs(&raw.attrs);
                self.out.push(':');
                for (j, line) in raw.lines.iter().enumerate() {
                    self.out.push('\n');
                    self.push_indent(indent + 1);
                    self.path.push(j);
                    let mut offset = 0;
                    for c in line.chars() {
                        self.markers_at(offset);
                        match c {
                            '|' => self.out.push_str("\\|"),
                            '^' => self.out.push_str("\\^"),
                            _ => self.out.push(c),
                        }
                        offset += c.len_utf16();
                    }
                    self.markers_at(offset);
                    self.path.pop();
                }
            }
            Block::Object(object) => {
                self.markers_at(0);
                self.out.push('{');
                self.out.push_str(&object.name);
                self.emit_attrs(&object.attrs);
                self.out.push('}');
                self.markers_at(1);
            }
        }
    }

    fn emit_inline(&mut self, children: &[InlineNode]) {
        for (i, child) in children.iter().enumerate() {
            self.path.push(i);
            match child {
                InlineNode::Text(text) => {
                    let mut offset = 0;
                    for c in text.chars() {
                        self.markers_at(offset);
                        self.emit_text_char(c);
                        offset += c.len_utf16();
                    }
                    self.markers_at(offset);
                }
                InlineNode::Mark(mark) => {
                    self.markers_at(0);
                    self.out.push('[');
                    match mark.mode {
                        MarkMode::Decorator => {}
                        MarkMode::Annotation => self.out.push('@'),
                        MarkMode::Overlay => self.out.push('~'),
                    }
                    self.out.push_str(&mark.name);
                    self.emit_attrs(&mark.attrs);
                    self.out.push(':');
                    self.emit_inline(&mark.children);
                    self.out.push(']');
                }
                InlineNode::Object(object) => {
                    self.markers_at(0);
                    self.out.push('{');
                    self.out.push_str(&object.name);
                    self.emit_attrs(&object.attrs);
                    self.out.push('}');
                    self.markers_at(1);
                }
            }
            self.path.pop();
        }
        // position after the last child
        self.path.push(children.len());
        self.markers_at(0);
        self.path.pop();
    }

    /// Escape a text character. Besides the structural set, `"` and the
    /// whitespace controls are written as escapes: a bare quote would start
    /// a string token on re-parse and a bare newline would end the line.
    fn emit_text_char(&mut self, c: char) {
        match c {
            '\\' | '[' | ']' | '{' | '}' | '|' | '^' | ';' | '"' => {
                self.out.push('\\');
                self.out.push(c);
            }
            '\n' => self.out.push_str("\\n"),
            '\t' => self.out.push_str("\\t"),
            '\r' => self.out.push_str("\\r"),
            _ => self.out.push(c),
        }
    }

    fn emit_attrs(&mut self, attrs: &Attributes) {
        for (key, value) in attrs {
            self.out.push(' ');
            self.out.push_str(key);
            self.out.push('=');
            self.emit_attr_value(value);
        }
    }

    fn emit_attr_value(&mut self, value: &AttrValue) {
        match value {
            AttrValue::String(s) => {
                self.out.push('"');
                for c in s.chars() {
                    match c {
                        '"' => self.out.push_str("\\\""),
                        '\\' => self.out.push_str("\\\\"),
                        '\n' => self.out.push_str("\\n"),
                        '\t' => self.out.push_str("\\t"),
                        '\r' => self.out.push_str("\\r"),
                        _ => self.out.push(c),
                    }
                }
                self.out.push('"');
            }
            // serde_json's Display is compact JSON with sorted object keys
            other => self.out.push_str(&other.to_string()),
        }
    }

    fn push_indent(&mut self, level: usize) {
        for _ in 0..level {
            self.out.push_str("  ");
        }
    }
}
