//! Structural and textual search over the document tree.

use crate::ast::inline::descendant_text;
use crate::ast::{
    path_plus, utf16_len, Attributes, Block, EditorState, InlineNode, InlineObject, Mark, Point,
    Selection, TextBlock,
};

use super::normalize::normalize;

/// Locate the leftmost occurrence of `pattern` in `state` and return the
/// selection spanning it. `None` when the pattern does not occur or does
/// not parse.
pub fn get_range(state: &EditorState, pattern: &str) -> Option<Selection> {
    let blocks = normalize(pattern)?;
    match blocks.as_slice() {
        [] => None,
        [single] => match_single(state, single),
        many => match_window(state, many),
    }
}

/// The point just before the leftmost occurrence of `pattern`.
pub fn get_point_before(state: &EditorState, pattern: &str) -> Option<Point> {
    get_range(state, pattern).map(|selection| selection.anchor)
}

/// The point just after the leftmost occurrence of `pattern`.
pub fn get_point_after(state: &EditorState, pattern: &str) -> Option<Point> {
    get_range(state, pattern).map(|selection| selection.focus)
}

fn match_single(state: &EditorState, pattern: &Block) -> Option<Selection> {
    match pattern {
        Block::Text(pattern_block) => {
            for (i, block) in state.blocks.iter().enumerate() {
                let Some(doc_block) = block.as_text() else {
                    continue;
                };
                let base = vec![i];
                if let Some(selection) = search_children(&doc_block.children, &base, pattern_block)
                {
                    return Some(selection);
                }
            }
            None
        }
        Block::Object(pattern_object) => {
            for (i, block) in state.blocks.iter().enumerate() {
                if let Block::Object(doc_object) = block {
                    if doc_object.name == pattern_object.name
                        && attrs_superset(&pattern_object.attrs, &doc_object.attrs)
                    {
                        return Some(Selection::new(
                            Point::new(vec![i], 0),
                            Point::new(vec![i], 1),
                        ));
                    }
                }
            }
            None
        }
        // container and raw patterns have no search semantics
        _ => None,
    }
}

/// Dispatch on the shape of the pattern block's inline content.
fn search_children(
    children: &[InlineNode],
    base: &[usize],
    pattern: &TextBlock,
) -> Option<Selection> {
    match pattern.children.as_slice() {
        [InlineNode::Text(needle)] => search_text(children, base, needle),
        [InlineNode::Mark(pattern_mark), ..] => {
            let pattern_text = descendant_text(&pattern_mark.children);
            search_mark(children, base, pattern_mark, &pattern_text)
        }
        [InlineNode::Object(pattern_object), ..] => search_object(children, base, pattern_object),
        _ => None,
    }
}

/// Substring search across text leaves, descending into marks. The first
/// hit in traversal order is the leftmost occurrence.
fn search_text(children: &[InlineNode], base: &[usize], needle: &str) -> Option<Selection> {
    for (i, child) in children.iter().enumerate() {
        match child {
            InlineNode::Text(text) => {
                if let Some(byte_at) = text.find(needle) {
                    let start = utf16_len(&text[..byte_at]);
                    let len = utf16_len(needle);
                    let path = path_plus(base, i);
                    return Some(Selection::new(
                        Point::new(path.clone(), start),
                        Point::new(path, start + len),
                    ));
                }
            }
            InlineNode::Mark(mark) => {
                if let Some(selection) = search_text(&mark.children, &path_plus(base, i), needle) {
                    return Some(selection);
                }
            }
            InlineNode::Object(_) => {}
        }
    }
    None
}

/// Find a mark with the pattern's type and mode, an attribute superset,
/// and descendant text starting with the pattern's. The selection spans
/// the matched mark from the end of the preceding text sibling (when one
/// exists) to the start of the following sibling slot.
fn search_mark(
    children: &[InlineNode],
    base: &[usize],
    pattern: &Mark,
    pattern_text: &str,
) -> Option<Selection> {
    for (i, child) in children.iter().enumerate() {
        if let InlineNode::Mark(mark) = child {
            if mark.name == pattern.name
                && mark.mode == pattern.mode
                && attrs_superset(&pattern.attrs, &mark.attrs)
                && descendant_text(&mark.children).starts_with(pattern_text)
            {
                let anchor = match i.checked_sub(1).and_then(|p| children[p].as_text()) {
                    Some(previous) => Point::new(path_plus(base, i - 1), utf16_len(previous)),
                    None => Point::new(path_plus(base, i), 0),
                };
                let focus = Point::new(path_plus(base, i + 1), 0);
                return Some(Selection::new(anchor, focus));
            }
            if let Some(selection) =
                search_mark(&mark.children, &path_plus(base, i), pattern, pattern_text)
            {
                return Some(selection);
            }
        }
    }
    None
}

fn search_object(
    children: &[InlineNode],
    base: &[usize],
    pattern: &InlineObject,
) -> Option<Selection> {
    for (i, child) in children.iter().enumerate() {
        match child {
            InlineNode::Object(object)
                if object.name == pattern.name && attrs_superset(&pattern.attrs, &object.attrs) =>
            {
                let path = path_plus(base, i);
                return Some(Selection::new(
                    Point::new(path.clone(), 0),
                    Point::new(path, 1),
                ));
            }
            InlineNode::Mark(mark) => {
                if let Some(selection) = search_object(&mark.children, &path_plus(base, i), pattern)
                {
                    return Some(selection);
                }
            }
            _ => {}
        }
    }
    None
}

/// Multi-block match: the first document block must end with the first
/// pattern block's text, the last must start with the last pattern
/// block's, and interior blocks must match exactly. Boundary offsets are
/// translated to paths through the in-order text leaves.
fn match_window(state: &EditorState, patterns: &[Block]) -> Option<Selection> {
    let pattern_blocks: Vec<&TextBlock> = patterns
        .iter()
        .map(Block::as_text)
        .collect::<Option<Vec<_>>>()?;
    let pattern_texts: Vec<String> = pattern_blocks
        .iter()
        .map(|block| descendant_text(&block.children))
        .collect();
    let n = patterns.len();
    if state.blocks.len() < n {
        return None;
    }
    for start in 0..=(state.blocks.len() - n) {
        let Some(window) = state.blocks[start..start + n]
            .iter()
            .map(Block::as_text)
            .collect::<Option<Vec<_>>>()
        else {
            continue;
        };
        let doc_texts: Vec<String> = window
            .iter()
            .map(|block| descendant_text(&block.children))
            .collect();
        if !doc_texts[0].ends_with(&pattern_texts[0]) {
            continue;
        }
        if !doc_texts[n - 1].starts_with(&pattern_texts[n - 1]) {
            continue;
        }
        if (1..n - 1).any(|k| doc_texts[k] != pattern_texts[k]) {
            continue;
        }
        let anchor_offset = utf16_len(&doc_texts[0]) - utf16_len(&pattern_texts[0]);
        let anchor = point_at_offset(window[0], start, anchor_offset);
        let focus = point_at_offset(
            window[n - 1],
            start + n - 1,
            utf16_len(&pattern_texts[n - 1]),
        );
        return Some(Selection::new(anchor, focus));
    }
    None
}

/// Translate a UTF-16 offset into a block's concatenated text to a tree
/// point, walking text leaves left to right and descending into marks. An
/// offset on a leaf boundary resolves to the end of the earlier leaf.
fn point_at_offset(block: &TextBlock, block_index: usize, offset: usize) -> Point {
    let base = vec![block_index];
    let mut remaining = offset;
    walk_leaves(&block.children, &base, &mut remaining)
        .unwrap_or_else(|| Point::new(path_plus(&base, 0), 0))
}

fn walk_leaves(children: &[InlineNode], base: &[usize], remaining: &mut usize) -> Option<Point> {
    for (i, child) in children.iter().enumerate() {
        match child {
            InlineNode::Text(text) => {
                let len = utf16_len(text);
                if *remaining <= len {
                    return Some(Point::new(path_plus(base, i), *remaining));
                }
                *remaining -= len;
            }
            InlineNode::Mark(mark) => {
                if let Some(point) = walk_leaves(&mark.children, &path_plus(base, i), remaining) {
                    return Some(point);
                }
            }
            InlineNode::Object(_) => {}
        }
    }
    None
}

/// Every pattern attribute must be present with an equal value; keys the
/// pattern omits match anything.
fn attrs_superset(pattern: &Attributes, doc: &Attributes) -> bool {
    pattern
        .iter()
        .all(|(key, value)| doc.get(key) == Some(value))
}
