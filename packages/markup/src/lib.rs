//! # Folio Markup
//!
//! Lightweight view over serialized rich-text content.
//!
//! Content stays an opaque HTML string. This crate only answers the
//! questions the editor needs to keep every mutation whole-element:
//! where tags start and end, which elements enclose an offset, and whether
//! a string is a complete fragment.

pub mod elements;
pub mod error;
pub mod escape;
pub mod lexer;
pub mod outline;

pub use elements::{is_block, is_format_block, is_formatting, is_inline, is_list, is_void};
pub use error::{MarkupError, MarkupResult};
pub use escape::{escape_attr, escape_text, text_content};
pub use lexer::{lex, LexError, SpannedToken, Token};
pub use outline::{ElementSpan, Outline, TokenKind, TokenSpan};

/// Check that `source` is a complete markup fragment
pub fn check_well_formed(source: &str) -> MarkupResult<()> {
    Outline::parse(source).map(|_| ())
}

/// Whether `source` is a complete markup fragment
pub fn is_well_formed(source: &str) -> bool {
    check_well_formed(source).is_ok()
}
