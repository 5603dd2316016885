use crate::lexer::{lex, Token};

/// Escape plain text for insertion between tags
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a value for a double-quoted attribute
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Visible text of a fragment: tags dropped, entities decoded
///
/// Characters the lexer rejects are kept verbatim, so this never fails.
pub fn text_content(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    for result in lex(fragment) {
        match result {
            Ok(spanned) => match spanned.token {
                Token::Text(text) => out.push_str(text),
                Token::Entity(entity) => match decode_entity(entity) {
                    Some(c) => out.push(c),
                    None => out.push_str(entity),
                },
                Token::OpenTag(_) | Token::CloseTag(_) => {}
            },
            Err(err) => out.push_str(&fragment[err.span]),
        }
    }
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    let body = entity.strip_prefix('&')?.strip_suffix(';')?;
    match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let code = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                body.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}
