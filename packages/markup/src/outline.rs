//! Element outline of a markup fragment
//!
//! One linear pass pairs open and close tags on a stack. The result keeps
//! every token span plus one [`ElementSpan`] per element in document order,
//! which is enough to answer boundary and nesting queries by offset.

use std::ops::Range;

use crate::elements::is_void;
use crate::error::{MarkupError, MarkupResult};
use crate::lexer::{lex, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Open,
    Close,
    Entity,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpan {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

/// One element and where its tags sit in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSpan {
    /// Lowercased tag name
    pub name: String,
    pub open: Range<usize>,
    /// Empty range at `open.end` for void elements
    pub close: Range<usize>,
    /// Index of the enclosing element
    pub parent: Option<usize>,
    pub void: bool,
}

impl ElementSpan {
    /// Content between the tags
    pub fn inner(&self) -> Range<usize> {
        self.open.end..self.close.start
    }

    /// The whole element including its tags
    pub fn outer(&self) -> Range<usize> {
        self.open.start..self.close.end
    }

    pub fn is_void(&self) -> bool {
        self.void
    }
}

#[derive(Debug, Clone)]
pub struct Outline<'src> {
    source: &'src str,
    tokens: Vec<TokenSpan>,
    elements: Vec<ElementSpan>,
}

impl<'src> Outline<'src> {
    /// Parse `source`, failing unless it is a complete fragment
    pub fn parse(source: &'src str) -> MarkupResult<Self> {
        let mut tokens = Vec::new();
        let mut elements: Vec<ElementSpan> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();

        for result in lex(source) {
            let spanned = result.map_err(|err| MarkupError::Lexer {
                pos: err.span.start,
            })?;
            let span = spanned.span.clone();

            let kind = match spanned.token {
                Token::OpenTag(_) => {
                    let name = spanned.token.tag_name().unwrap_or_default();
                    let void = is_void(&name) || spanned.token.is_self_closing();
                    let index = elements.len();
                    elements.push(ElementSpan {
                        name,
                        open: span.clone(),
                        close: span.end..span.end,
                        parent: stack.last().copied(),
                        void,
                    });
                    if !void {
                        stack.push(index);
                    }
                    TokenKind::Open
                }
                Token::CloseTag(_) => {
                    let found = spanned.token.tag_name().unwrap_or_default();
                    let Some(top) = stack.pop() else {
                        return Err(MarkupError::UnexpectedClose {
                            name: found,
                            pos: span.start,
                        });
                    };
                    let element = &mut elements[top];
                    if element.name != found {
                        return Err(MarkupError::Mismatched {
                            expected: element.name.clone(),
                            found,
                            pos: span.start,
                        });
                    }
                    element.close = span.clone();
                    TokenKind::Close
                }
                Token::Entity(_) => TokenKind::Entity,
                Token::Text(_) => TokenKind::Text,
            };

            tokens.push(TokenSpan { kind, span });
        }

        if let Some(&open) = stack.last() {
            let element = &elements[open];
            return Err(MarkupError::Unclosed {
                name: element.name.clone(),
                pos: element.open.start,
            });
        }

        Ok(Self {
            source,
            tokens,
            elements,
        })
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn tokens(&self) -> &[TokenSpan] {
        &self.tokens
    }

    /// Elements in document order
    pub fn elements(&self) -> &[ElementSpan] {
        &self.elements
    }

    pub fn element(&self, index: usize) -> &ElementSpan {
        &self.elements[index]
    }

    /// Index of the token containing `offset`, if any
    fn token_index_at(&self, offset: usize) -> Option<usize> {
        let after = self.tokens.partition_point(|t| t.span.start <= offset);
        let index = after.checked_sub(1)?;
        (offset < self.tokens[index].span.end).then_some(index)
    }

    /// Whether a splice may start or end at `offset`
    ///
    /// Boundaries are char boundaries that do not fall inside a tag or an
    /// entity.
    pub fn is_boundary(&self, offset: usize) -> bool {
        if offset > self.source.len() || !self.source.is_char_boundary(offset) {
            return false;
        }
        match self.token_index_at(offset) {
            None => true,
            Some(index) => {
                let token = &self.tokens[index];
                token.span.start == offset || token.kind == TokenKind::Text
            }
        }
    }

    /// The token that ends exactly at `offset`
    pub fn token_before(&self, offset: usize) -> Option<&TokenSpan> {
        if offset == 0 {
            return None;
        }
        let index = self.token_index_at(offset - 1)?;
        Some(&self.tokens[index])
    }

    /// Innermost open element whose content contains `offset`
    pub fn enclosing(&self, offset: usize) -> Option<usize> {
        self.ancestors(offset..offset).into_iter().next()
    }

    /// Elements whose content contains the whole range, innermost first
    pub fn ancestors(&self, range: Range<usize>) -> Vec<usize> {
        let mut found = Vec::new();
        let mut current = self.innermost_containing(range.start);
        while let Some(index) = current {
            let inner = self.elements[index].inner();
            if inner.start <= range.start && range.end <= inner.end {
                found.push(index);
            }
            current = self.elements[index].parent;
        }
        found
    }

    fn innermost_containing(&self, offset: usize) -> Option<usize> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.void && e.open.end <= offset && offset <= e.close.start)
            .map(|(index, _)| index)
            .last()
    }

    /// Whether `range` starts and ends on boundaries and contains either
    /// both tags of an element or neither
    pub fn is_balanced(&self, range: Range<usize>) -> bool {
        if range.start > range.end || !self.is_boundary(range.start) || !self.is_boundary(range.end)
        {
            return false;
        }
        self.elements.iter().filter(|e| !e.void).all(|e| {
            let open_in = range.start <= e.open.start && e.open.end <= range.end;
            let close_in = range.start <= e.close.start && e.close.end <= range.end;
            open_in == close_in
        })
    }

    /// Direct children of `parent`, or top-level elements for `None`
    pub fn children(&self, parent: Option<usize>) -> Vec<usize> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.parent == parent)
            .map(|(index, _)| index)
            .collect()
    }

    /// Tag spans of matching elements lying completely inside `range`, in
    /// source order
    pub fn element_tags(&self, range: Range<usize>, matches: impl Fn(&str) -> bool) -> Vec<Range<usize>> {
        let mut tags: Vec<Range<usize>> = Vec::new();
        for element in &self.elements {
            let outer = element.outer();
            if outer.start < range.start || outer.end > range.end || !matches(&element.name) {
                continue;
            }
            tags.push(element.open.clone());
            if !element.void {
                tags.push(element.close.clone());
            }
        }
        tags.sort_by_key(|r| r.start);
        tags
    }

    /// The slice at `range` with the tags of matching elements removed
    pub fn strip_elements(&self, range: Range<usize>, strip: impl Fn(&str) -> bool) -> String {
        let mut out = String::with_capacity(range.len());
        let mut cursor = range.start;
        for span in self.element_tags(range.clone(), strip) {
            out.push_str(&self.source[cursor..span.start]);
            cursor = span.end;
        }
        out.push_str(&self.source[cursor..range.end]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_tags_and_records_parents() {
        let outline = Outline::parse("<p>a<strong>b</strong></p>").unwrap();
        let elements = outline.elements();

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].name, "p");
        assert_eq!(elements[0].outer(), 0..26);
        assert_eq!(elements[1].name, "strong");
        assert_eq!(elements[1].inner(), 12..13);
        assert_eq!(elements[1].parent, Some(0));
    }

    #[test]
    fn test_void_and_self_closing_elements_need_no_close() {
        let outline = Outline::parse(r#"<p>a<br>b<img src="x" /></p>"#).unwrap();
        assert!(outline.elements()[1].is_void());
        assert!(outline.elements()[2].is_void());
    }

    #[test]
    fn test_reports_mismatched_close() {
        let err = Outline::parse("<p><em>x</p></em>").unwrap_err();
        assert_eq!(
            err,
            MarkupError::Mismatched {
                expected: "em".to_string(),
                found: "p".to_string(),
                pos: 8,
            }
        );
    }

    #[test]
    fn test_reports_unclosed_and_stray_close() {
        assert!(matches!(
            Outline::parse("<p>open"),
            Err(MarkupError::Unclosed { pos: 0, .. })
        ));
        assert!(matches!(
            Outline::parse("text</p>"),
            Err(MarkupError::UnexpectedClose { pos: 4, .. })
        ));
    }

    #[test]
    fn test_boundaries_exclude_tag_and_entity_interiors() {
        let outline = Outline::parse("<p>a&amp;b</p>").unwrap();

        assert!(outline.is_boundary(0));
        assert!(!outline.is_boundary(1));
        assert!(outline.is_boundary(3));
        assert!(outline.is_boundary(4));
        assert!(!outline.is_boundary(6));
        assert!(outline.is_boundary(9));
        assert!(outline.is_boundary(14));
        assert!(!outline.is_boundary(15));
    }

    #[test]
    fn test_boundaries_respect_multibyte_chars() {
        let outline = Outline::parse("é").unwrap();
        assert!(!outline.is_boundary(1));
        assert!(outline.is_boundary(2));
    }

    #[test]
    fn test_ancestors_are_innermost_first() {
        // <p><em><strong>abc</strong></em></p>
        let outline = Outline::parse("<p><em><strong>abc</strong></em></p>").unwrap();
        let names: Vec<_> = outline
            .ancestors(15..17)
            .into_iter()
            .map(|i| outline.element(i).name.as_str())
            .collect();
        assert_eq!(names, vec!["strong", "em", "p"]);
        assert_eq!(outline.enclosing(0), None);
    }

    #[test]
    fn test_balanced_ranges() {
        let source = "<p>a<em>b</em>c</p>";
        let outline = Outline::parse(source).unwrap();

        assert!(outline.is_balanced(3..15));
        assert!(outline.is_balanced(8..9));
        assert!(!outline.is_balanced(3..9));
        assert!(!outline.is_balanced(5..9));
    }

    #[test]
    fn test_children_of_root() {
        let outline = Outline::parse("<p>a</p><ul><li>b</li></ul>").unwrap();
        assert_eq!(outline.children(None), vec![0, 1]);
        assert_eq!(outline.children(Some(1)), vec![2]);
    }

    #[test]
    fn test_strip_elements_inside_range() {
        let source = "<p>a<strong>b</strong><em>c</em></p>";
        let outline = Outline::parse(source).unwrap();
        let stripped = outline.strip_elements(3..source.len() - 4, |name| name == "strong");
        assert_eq!(stripped, "ab<em>c</em>");
    }
}
