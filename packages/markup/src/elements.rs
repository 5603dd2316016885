//! Element classes used by the editing primitives.

/// Elements without a closing tag
pub fn is_void(name: &str) -> bool {
    matches!(
        name,
        "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta"
            | "source" | "track" | "wbr"
    )
}

/// Phrasing elements that may wrap part of a line
pub fn is_inline(name: &str) -> bool {
    matches!(
        name,
        "a" | "abbr" | "b" | "cite" | "code" | "del" | "em" | "font" | "i" | "ins" | "kbd"
            | "mark" | "q" | "s" | "samp" | "small" | "span" | "strike" | "strong" | "sub"
            | "sup" | "u" | "var"
    )
}

/// Presentational inline elements removed by "clear formatting"
///
/// Links are content, not formatting, and survive.
pub fn is_formatting(name: &str) -> bool {
    matches!(
        name,
        "b" | "code" | "em" | "font" | "i" | "mark" | "s" | "small" | "span" | "strike"
            | "strong" | "sub" | "sup" | "u"
    )
}

pub fn is_block(name: &str) -> bool {
    is_format_block(name) || matches!(name, "li" | "ol" | "ul")
}

/// Blocks whose tag can be swapped for another block type in place
pub fn is_format_block(name: &str) -> bool {
    matches!(
        name,
        "blockquote" | "div" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "p" | "pre"
    )
}

pub fn is_list(name: &str) -> bool {
    matches!(name, "ol" | "ul")
}
