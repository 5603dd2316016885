//! Block-level formatting for the block holding the caret.

use std::ops::Range;

use folio_markup::{is_block, is_format_block, is_list, ElementSpan, Outline};
use serde::{Deserialize, Serialize};

use super::splice::Splice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "block", content = "level")]
pub enum BlockType {
    Paragraph,
    Heading(u8),
    Blockquote,
    CodeBlock,
    BulletList,
    NumberedList,
}

impl BlockType {
    /// Element name this block type produces
    pub fn tag(&self) -> String {
        match self {
            BlockType::Paragraph => "p".to_string(),
            BlockType::Heading(level) => format!("h{}", (*level).clamp(1, 6)),
            BlockType::Blockquote => "blockquote".to_string(),
            BlockType::CodeBlock => "pre".to_string(),
            BlockType::BulletList => "ul".to_string(),
            BlockType::NumberedList => "ol".to_string(),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, BlockType::BulletList | BlockType::NumberedList)
    }

    pub fn label(&self) -> &'static str {
        match self {
            BlockType::Paragraph => "Paragraph",
            BlockType::Heading(_) => "Heading",
            BlockType::Blockquote => "Blockquote",
            BlockType::CodeBlock => "Code block",
            BlockType::BulletList => "Bullet list",
            BlockType::NumberedList => "Numbered list",
        }
    }
}

/// Rewrite of the block at `at`, or `None` when it already has the type
pub(crate) fn reblock<'a>(outline: &Outline<'a>, at: usize, block: BlockType) -> Option<Splice<'a>> {
    let ancestors: Vec<(usize, &ElementSpan)> = outline
        .ancestors(at..at)
        .into_iter()
        .map(|index| (index, outline.element(index)))
        .collect();
    let innermost_block = ancestors.iter().find(|(_, e)| is_block(&e.name)).copied();
    let tag = block.tag();

    if block.is_list() {
        if let Some((index, list)) = ancestors.iter().find(|(_, e)| is_list(&e.name)).copied() {
            if list.name == tag {
                return Some(unwrap_list(outline, index, list));
            }
            return Some(rename(outline, list, &tag));
        }

        let open = format!("<{}><li>", tag);
        let close = format!("</li></{}>", tag);
        return Some(match innermost_block {
            Some((_, element)) if is_format_block(&element.name) => {
                let mut splice = Splice::new(outline.source(), element.outer());
                splice.insert(&open);
                if matches!(element.name.as_str(), "p" | "div") {
                    splice.keep(element.inner());
                } else {
                    splice.keep(element.outer());
                }
                splice.insert(&close);
                splice
            }
            parent => wrap_run(outline, parent, at, &open, &close),
        });
    }

    match innermost_block {
        Some((_, element)) if is_format_block(&element.name) => {
            if element.name == tag {
                None
            } else {
                Some(rename(outline, element, &tag))
            }
        }
        parent => Some(wrap_run(
            outline,
            parent,
            at,
            &format!("<{}>", tag),
            &format!("</{}>", tag),
        )),
    }
}

/// Swap an element's tag name, keeping its attributes
fn rename<'a>(outline: &Outline<'a>, element: &ElementSpan, tag: &str) -> Splice<'a> {
    let source = outline.source();
    let attributes = &source[element.open.start + 1 + element.name.len()..element.open.end];
    let mut splice = Splice::new(source, element.outer());
    splice
        .insert(&format!("<{}{}", tag, attributes))
        .keep(element.inner())
        .insert(&format!("</{}>", tag));
    splice
}

/// Turn every item of a list into a paragraph
fn unwrap_list<'a>(outline: &Outline<'a>, index: usize, list: &ElementSpan) -> Splice<'a> {
    let mut splice = Splice::new(outline.source(), list.outer());
    let inner = list.inner();
    let mut cursor = inner.start;

    for child in outline.children(Some(index)) {
        let item = outline.element(child);
        if cursor < item.open.start {
            splice.keep(cursor..item.open.start);
        }
        if item.name != "li" {
            splice.keep(item.outer());
        } else if outline
            .children(Some(child))
            .into_iter()
            .any(|grandchild| is_block(&outline.element(grandchild).name))
        {
            splice.keep(item.inner());
        } else {
            splice.insert("<p>").keep(item.inner()).insert("</p>");
        }
        cursor = item.close.end;
    }
    if cursor < inner.end {
        splice.keep(cursor..inner.end);
    }
    splice
}

/// Wrap the run of inline content around `at` inside `parent`
fn wrap_run<'a>(
    outline: &Outline<'a>,
    parent: Option<(usize, &ElementSpan)>,
    at: usize,
    open: &str,
    close: &str,
) -> Splice<'a> {
    let run = inline_run(outline, parent, at);
    let mut splice = Splice::new(outline.source(), run.clone());
    splice.insert(open).keep(run).insert(close);
    splice
}

fn inline_run(outline: &Outline<'_>, parent: Option<(usize, &ElementSpan)>, at: usize) -> Range<usize> {
    let bounds = match parent {
        Some((_, element)) => element.inner(),
        None => 0..outline.source().len(),
    };
    let mut start = bounds.start;
    let mut end = bounds.end;

    for child in outline.children(parent.map(|(index, _)| index)) {
        let element = outline.element(child);
        if !is_block(&element.name) {
            continue;
        }
        let outer = element.outer();
        if outer.end <= at {
            start = start.max(outer.end);
        } else if outer.start >= at {
            end = end.min(outer.start);
        }
    }
    start..end
}
