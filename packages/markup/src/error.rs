use thiserror::Error;

pub type MarkupResult<T> = Result<T, MarkupError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    #[error("Unexpected character at {pos}")]
    Lexer { pos: usize },

    #[error("Closing tag </{name}> at {pos} has no matching open tag")]
    UnexpectedClose { name: String, pos: usize },

    #[error("Closing tag </{found}> at {pos} does not match <{expected}>")]
    Mismatched {
        expected: String,
        found: String,
        pos: usize,
    },

    #[error("Element <{name}> opened at {pos} is never closed")]
    Unclosed { name: String, pos: usize },
}

impl MarkupError {
    /// Byte offset the error refers to
    pub fn pos(&self) -> usize {
        match self {
            MarkupError::Lexer { pos }
            | MarkupError::UnexpectedClose { pos, .. }
            | MarkupError::Mismatched { pos, .. }
            | MarkupError::Unclosed { pos, .. } => *pos,
        }
    }
}
