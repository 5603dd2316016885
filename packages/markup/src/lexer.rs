//! Lexer for serialized rich-text content using logos
//!
//! Tags and entities are atomic; everything between them is text.

use logos::Logos;
use std::ops::Range;

/// Token types for HTML fragments
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token<'src> {
    // `<name attr="…">` or `<name … />`
    #[regex(r#"<[a-zA-Z][a-zA-Z0-9-]*([^<>"']|"[^"]*"|'[^']*')*>"#, |lex| lex.slice())]
    OpenTag(&'src str),

    #[regex(r"</[a-zA-Z][a-zA-Z0-9-]*[ \t\r\n]*>", |lex| lex.slice())]
    CloseTag(&'src str),

    #[regex(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z][a-zA-Z0-9]*);", |lex| lex.slice())]
    Entity(&'src str),

    #[regex(r"[^<&]+", |lex| lex.slice())]
    Text(&'src str),
}

impl<'src> Token<'src> {
    /// Lowercased element name of an open or close tag
    pub fn tag_name(&self) -> Option<String> {
        let raw = match self {
            Token::OpenTag(s) => &s[1..],
            Token::CloseTag(s) => &s[2..],
            _ => return None,
        };
        let end = raw
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
            .unwrap_or(raw.len());
        Some(raw[..end].to_ascii_lowercase())
    }

    /// `<br/>`-style tag
    pub fn is_self_closing(&self) -> bool {
        matches!(self, Token::OpenTag(s) if s.ends_with("/>"))
    }
}

/// A token with its span
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken<'src> {
    pub token: Token<'src>,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub span: Range<usize>,
    pub message: String,
}

/// Lex content into tokens with spans
pub fn lex(source: &str) -> impl Iterator<Item = Result<SpannedToken<'_>, LexError>> + '_ {
    Token::lexer(source)
        .spanned()
        .map(|(result, span)| match result {
            Ok(token) => Ok(SpannedToken { token, span }),
            Err(_) => Err(LexError {
                span,
                message: "Unexpected character".to_string(),
            }),
        })
}
