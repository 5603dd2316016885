//! # Formatting Commands
//!
//! Closed vocabulary of toolbar operations and their mapping onto canvas
//! primitives.
//!
//! ## Command Semantics
//!
//! ### Inline styles
//! - `bold` and `italic` toggle on the selection
//! - `clear-formatting` strips presentational tags but keeps links
//!
//! ### Blocks
//! - Headings, quotes and code blocks rename the block at the selection
//!   start; lists toggle
//!
//! ### Inserts
//! - `insert-link` links a non-empty selection, otherwise inserts a new
//!   anchor at the caret
//! - `insert-image` always inserts at the caret or over the selection

use std::collections::HashMap;

use folio_markup::{escape_attr, escape_text};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::canvas::{BlockType, Canvas, CanvasResult, Edit, InlineStyle};

const IMAGE_STYLE: &str = "max-width: 100%; height: auto; margin: 10px 0;";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", tag = "command")]
pub enum Command {
    ClearFormatting,
    Bold,
    Italic,
    #[serde(rename = "heading-1")]
    Heading1,
    #[serde(rename = "heading-2")]
    Heading2,
    #[serde(rename = "heading-3")]
    Heading3,
    BulletList,
    NumberedList,
    Blockquote,
    CodeBlock,
    InsertLink {
        url: String,
        #[serde(default)]
        text: String,
    },
    InsertImage {
        url: String,
        #[serde(default)]
        alt: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Command {command} requires a non-empty {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
}

impl Command {
    /// Build a command from its toolbar name and string arguments
    pub fn parse(name: &str, args: &HashMap<String, String>) -> Result<Self, CommandError> {
        let arg = |key: &str| args.get(key).map(|v| v.trim().to_string()).unwrap_or_default();
        let required_url = |command: &'static str| {
            let url = arg("url");
            if url.is_empty() {
                return Err(CommandError::MissingArgument {
                    command,
                    argument: "url",
                });
            }
            Ok(url)
        };

        let command = match name {
            "clear-formatting" => Command::ClearFormatting,
            "bold" => Command::Bold,
            "italic" => Command::Italic,
            "heading-1" => Command::Heading1,
            "heading-2" => Command::Heading2,
            "heading-3" => Command::Heading3,
            "bullet-list" => Command::BulletList,
            "numbered-list" => Command::NumberedList,
            "blockquote" => Command::Blockquote,
            "code-block" => Command::CodeBlock,
            "insert-link" => Command::InsertLink {
                url: required_url("insert-link")?,
                text: arg("text"),
            },
            "insert-image" => Command::InsertImage {
                url: required_url("insert-image")?,
                alt: arg("alt"),
            },
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::ClearFormatting => "clear-formatting",
            Command::Bold => "bold",
            Command::Italic => "italic",
            Command::Heading1 => "heading-1",
            Command::Heading2 => "heading-2",
            Command::Heading3 => "heading-3",
            Command::BulletList => "bullet-list",
            Command::NumberedList => "numbered-list",
            Command::Blockquote => "blockquote",
            Command::CodeBlock => "code-block",
            Command::InsertLink { .. } => "insert-link",
            Command::InsertImage { .. } => "insert-image",
        }
    }

    fn block_type(&self) -> Option<BlockType> {
        match self {
            Command::Heading1 => Some(BlockType::Heading(1)),
            Command::Heading2 => Some(BlockType::Heading(2)),
            Command::Heading3 => Some(BlockType::Heading(3)),
            Command::BulletList => Some(BlockType::BulletList),
            Command::NumberedList => Some(BlockType::NumberedList),
            Command::Blockquote => Some(BlockType::Blockquote),
            Command::CodeBlock => Some(BlockType::CodeBlock),
            _ => None,
        }
    }
}

/// Maps commands onto canvas primitives
///
/// Dispatch only ever touches the canvas; the session sees the result
/// through the content it reads back.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandDispatcher;

impl CommandDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Apply `command`; `None` when it changed nothing
    pub fn dispatch(&self, canvas: &mut Canvas, command: &Command) -> CanvasResult<Option<Edit>> {
        tracing::debug!("Dispatching {}", command.name());

        if let Some(block) = command.block_type() {
            return canvas.set_block_type(block);
        }

        let edit = match command {
            Command::ClearFormatting => canvas.apply_inline_style(&InlineStyle::Plain)?,
            Command::Bold => canvas.apply_inline_style(&InlineStyle::Bold)?,
            Command::Italic => canvas.apply_inline_style(&InlineStyle::Italic)?,
            Command::InsertLink { url, text } => {
                if canvas.selection().is_some() {
                    canvas.apply_inline_style(&InlineStyle::Link { href: url.clone() })?
                } else {
                    let label = if text.trim().is_empty() { url } else { text };
                    canvas.insert_fragment(&format!(
                        r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
                        escape_attr(url),
                        escape_text(label)
                    ))?
                }
            }
            Command::InsertImage { url, alt } => canvas.insert_fragment(&format!(
                r#"<img src="{}" alt="{}" style="{}" />"#,
                escape_attr(url),
                escape_attr(alt),
                IMAGE_STYLE
            ))?,
            _ => return Ok(None),
        };
        Ok(Some(edit))
    }
}
