//! Inline formatting over a balanced selection.
//!
//! A style either splits the selection out of the enclosing elements that
//! already carry it, or wraps the selection in a fresh element. Both paths
//! keep the selection on the same visible text.

use std::ops::Range;

use folio_markup::{escape_attr, is_formatting, is_inline, ElementSpan, Outline};
use serde::{Deserialize, Serialize};

use super::splice::Splice;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "style")]
pub enum InlineStyle {
    Bold,
    Italic,
    Link { href: String },
    /// Clear presentational formatting
    Plain,
}

impl InlineStyle {
    /// Whether an element named `name` carries this style
    pub fn matches(&self, name: &str) -> bool {
        match self {
            InlineStyle::Bold => matches!(name, "strong" | "b"),
            InlineStyle::Italic => matches!(name, "em" | "i"),
            InlineStyle::Link { .. } => name == "a",
            InlineStyle::Plain => is_formatting(name),
        }
    }

    fn wrap_tags(&self) -> Option<(String, String)> {
        match self {
            InlineStyle::Bold => Some(("<strong>".to_string(), "</strong>".to_string())),
            InlineStyle::Italic => Some(("<em>".to_string(), "</em>".to_string())),
            InlineStyle::Link { href } => Some((
                format!(
                    r#"<a href="{}" target="_blank" rel="noopener noreferrer">"#,
                    escape_attr(href)
                ),
                "</a>".to_string(),
            )),
            InlineStyle::Plain => None,
        }
    }

    /// Toggles that may absorb an adjacent element of the same style
    fn merges_with_neighbours(&self) -> bool {
        matches!(self, InlineStyle::Bold | InlineStyle::Italic)
    }

    pub fn label(&self) -> &'static str {
        match self {
            InlineStyle::Bold => "Bold",
            InlineStyle::Italic => "Italic",
            InlineStyle::Link { .. } => "Link",
            InlineStyle::Plain => "Clear formatting",
        }
    }
}

/// Rewritten region plus where the selected text ends up
pub(crate) struct Restyled<'a> {
    pub splice: Splice<'a>,
    pub selection: Range<usize>,
}

/// Apply `style` to the balanced, non-empty `range`
pub(crate) fn restyle<'a>(outline: &Outline<'a>, range: Range<usize>, style: &InlineStyle) -> Restyled<'a> {
    let chain: Vec<&ElementSpan> = outline
        .ancestors(range.clone())
        .into_iter()
        .map(|index| outline.element(index))
        .take_while(|element| is_inline(&element.name))
        .collect();

    match chain.iter().rposition(|element| style.matches(&element.name)) {
        Some(outermost) => split_out(outline, &chain[..=outermost], range, style),
        None => wrap(outline, range, style),
    }
}

fn close_tag(name: &str) -> String {
    format!("</{}>", name)
}

/// Close `chain` before the selection and reopen it after
///
/// `chain` runs innermost first and its last element carries the style.
/// Parts of the chain left empty on either side are dropped instead of
/// being closed and reopened.
fn split_out<'a>(
    outline: &Outline<'a>,
    chain: &[&ElementSpan],
    range: Range<usize>,
    style: &InlineStyle,
) -> Restyled<'a> {
    let source = outline.source();
    let outermost = chain[chain.len() - 1];
    let region = outermost.outer();
    let mut splice = Splice::new(source, region.clone());

    let mut trim_end = range.start;
    let mut closes = String::new();
    for element in chain {
        if closes.is_empty() && element.open.end == trim_end {
            trim_end = element.open.start;
        } else {
            closes.push_str(&close_tag(&element.name));
        }
    }
    splice.keep(region.start..trim_end).insert(&closes);

    // Inner elements without the style stay around the selection
    let inner = &chain[..chain.len() - 1];
    let reopened: Vec<&&ElementSpan> = inner.iter().filter(|e| !style.matches(&e.name)).collect();
    for element in reopened.iter().rev() {
        splice.insert(&source[element.open.clone()]);
    }
    // Only a link is put back, carrying its new href
    let wrap = match style {
        InlineStyle::Link { .. } => style.wrap_tags(),
        _ => None,
    };
    if let Some((open, _)) = &wrap {
        splice.insert(open);
    }
    let dropped = outline.element_tags(range.clone(), |name| style.matches(name));
    let start = splice.position();
    splice.keep_without(range.clone(), &dropped);
    let end = splice.position();
    if let Some((_, close)) = &wrap {
        splice.insert(close);
    }
    for element in &reopened {
        splice.insert(&close_tag(&element.name));
    }

    let mut rest = range.end;
    let mut cancelled = 0;
    for element in chain {
        if element.close.start != rest {
            break;
        }
        rest = element.close.end;
        cancelled += 1;
    }
    for element in chain[cancelled..].iter().rev() {
        splice.insert(&source[element.open.clone()]);
    }
    splice.keep(rest..region.end);

    Restyled {
        splice,
        selection: start..end,
    }
}

fn wrap<'a>(outline: &Outline<'a>, range: Range<usize>, style: &InlineStyle) -> Restyled<'a> {
    let source = outline.source();
    let dropped = outline.element_tags(range.clone(), |name| style.matches(name));

    let Some((open, close)) = style.wrap_tags() else {
        let mut splice = Splice::new(source, range.clone());
        let start = splice.position();
        splice.keep_without(range, &dropped);
        let end = splice.position();
        return Restyled {
            splice,
            selection: start..end,
        };
    };

    let (left, right) = if style.merges_with_neighbours() {
        let styled = |element: &&ElementSpan| !element.void && style.matches(&element.name);
        (
            outline
                .elements()
                .iter()
                .filter(styled)
                .find(|e| e.close.end == range.start),
            outline
                .elements()
                .iter()
                .filter(styled)
                .find(|e| e.open.start == range.end),
        )
    } else {
        (None, None)
    };

    let mut splice;
    let start;
    let end;
    match (left, right) {
        (Some(left), Some(right)) if left.name == right.name => {
            splice = Splice::new(source, left.close.start..right.open.end);
            start = splice.position();
            splice.keep_without(range, &dropped);
            end = splice.position();
        }
        (_, Some(right)) => {
            splice = Splice::new(source, range.start..right.open.end);
            splice.insert(&source[right.open.clone()]);
            start = splice.position();
            splice.keep_without(range, &dropped);
            end = splice.position();
        }
        (Some(left), None) => {
            splice = Splice::new(source, left.close.start..range.end);
            start = splice.position();
            splice.keep_without(range, &dropped);
            end = splice.position();
            splice.insert(&source[left.close.clone()]);
        }
        (None, None) => {
            splice = Splice::new(source, range.clone());
            splice.insert(&open);
            start = splice.position();
            splice.keep_without(range, &dropped);
            end = splice.position();
            splice.insert(&close);
        }
    }

    Restyled {
        splice,
        selection: start..end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str, range: Range<usize>, style: InlineStyle) -> (String, String) {
        let outline = Outline::parse(source).unwrap();
        let restyled = restyle(&outline, range, &style);
        let selection = restyled.selection.clone();
        let (region, text) = restyled.splice.into_parts();
        let mut out = source.to_string();
        out.replace_range(region, &text);
        let selected = out[selection].to_string();
        (out, selected)
    }

    #[test]
    fn test_wraps_plain_text() {
        let (out, selected) = run("<p>abc</p>", 3..6, InlineStyle::Bold);
        assert_eq!(out, "<p><strong>abc</strong></p>");
        assert_eq!(selected, "abc");
    }

    #[test]
    fn test_unwraps_whole_element() {
        let (out, selected) = run("<p><strong>abc</strong></p>", 11..14, InlineStyle::Bold);
        assert_eq!(out, "<p>abc</p>");
        assert_eq!(selected, "abc");
    }

    #[test]
    fn test_splits_middle_out_of_element() {
        let (out, selected) = run("<p><strong>abc</strong></p>", 12..13, InlineStyle::Bold);
        assert_eq!(out, "<p><strong>a</strong>b<strong>c</strong></p>");
        assert_eq!(selected, "b");
    }

    #[test]
    fn test_rewrapping_next_to_siblings_joins_them() {
        let source = "<p><strong>a</strong>b<strong>c</strong></p>";
        let (out, selected) = run(source, 21..22, InlineStyle::Bold);
        assert_eq!(out, "<p><strong>abc</strong></p>");
        assert_eq!(selected, "b");
    }

    #[test]
    fn test_keeps_other_styles_around_the_selection() {
        let source = "<p><strong><em>abc</em></strong></p>";
        let (out, selected) = run(source, 15..18, InlineStyle::Bold);
        assert_eq!(out, "<p><em>abc</em></p>");
        assert_eq!(selected, "abc");
    }

    #[test]
    fn test_italic_twice_round_trips() {
        let (once, selected) = run("<p>abc</p>", 3..6, InlineStyle::Italic);
        assert_eq!(once, "<p><em>abc</em></p>");
        assert_eq!(selected, "abc");

        let (twice, selected) = run(&once, 7..10, InlineStyle::Italic);
        assert_eq!(twice, "<p>abc</p>");
        assert_eq!(selected, "abc");
    }

    #[test]
    fn test_bold_inside_italic_twice_round_trips() {
        let (once, _) = run("<p><em>abc</em></p>", 7..10, InlineStyle::Bold);
        assert_eq!(once, "<p><em><strong>abc</strong></em></p>");

        let (twice, selected) = run(&once, 15..18, InlineStyle::Bold);
        assert_eq!(twice, "<p><em>abc</em></p>");
        assert_eq!(selected, "abc");
    }

    #[test]
    fn test_strips_nested_tags_before_wrapping() {
        let source = "<p>a<b>b</b>c</p>";
        let (out, _) = run(source, 3..13, InlineStyle::Bold);
        assert_eq!(out, "<p><strong>abc</strong></p>");
    }

    #[test]
    fn test_link_replaces_existing_link() {
        let source = r#"<p><a href="old">abc</a></p>"#;
        let (out, selected) = run(
            source,
            17..20,
            InlineStyle::Link {
                href: "https://new".to_string(),
            },
        );
        assert_eq!(
            out,
            r#"<p><a href="https://new" target="_blank" rel="noopener noreferrer">abc</a></p>"#
        );
        assert_eq!(selected, "abc");
    }

    #[test]
    fn test_plain_keeps_links() {
        let source = r#"<p><strong><a href="x">abc</a></strong></p>"#;
        let (out, _) = run(source, 23..26, InlineStyle::Plain);
        assert_eq!(out, r#"<p><a href="x">abc</a></p>"#);
    }
}
