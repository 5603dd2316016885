//! # Canvas Model
//!
//! The live editing surface: one serialized content string plus caret and
//! selection.
//!
//! Every mutation is a single splice. The candidate content is built in
//! full, re-parsed, and committed only when it is still a complete
//! fragment, so a failed edit leaves the canvas untouched. A commit bumps
//! the revision, moves the caret and records an [`Edit`] for undo.

mod block;
mod inline;
mod splice;

use std::ops::Range;

use folio_markup::{check_well_formed, escape_text, MarkupError, Outline, TokenKind};
use thiserror::Error;

use crate::undo_stack::UndoStack;

pub use block::BlockType;
pub use inline::InlineStyle;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    #[error("Range {start}..{end} no longer holds the expected text")]
    RangeStale { start: usize, end: usize },

    #[error("Offset {offset} is outside the content (length {len})")]
    OutOfBounds { offset: usize, len: usize },

    #[error("Offset {0} falls inside a tag or entity")]
    NotABoundary(usize),

    #[error("Nothing is selected")]
    NoSelection,

    #[error("Selection {start}..{end} cuts through an element")]
    UnbalancedSelection { start: usize, end: usize },

    #[error("Fragment is not well-formed: {0}")]
    MalformedFragment(MarkupError),

    #[error("Edit would leave malformed content: {0}")]
    Malformed(MarkupError),
}

pub type CanvasResult<T> = Result<T, CanvasError>;

/// A non-collapsed selection in content order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
    /// Raw content slice, markup included
    pub text: String,
}

/// One committed splice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub removed: String,
    pub inserted: String,
    pub label: String,

    /// Revision the canvas reached with this edit
    pub revision: u64,

    pub(crate) before: (usize, usize),
    pub(crate) after: (usize, usize),
}

impl Edit {
    /// Range the edit replaced, in the old content
    pub fn removed_range(&self) -> Range<usize> {
        self.start..self.start + self.removed.len()
    }

    /// Range of the inserted text, in the new content
    pub fn inserted_range(&self) -> Range<usize> {
        self.start..self.start + self.inserted.len()
    }
}

#[derive(Debug)]
pub struct Canvas {
    content: String,
    anchor: usize,
    focus: usize,
    revision: u64,
    history: UndoStack,
}

impl Canvas {
    /// Canvas over `content`, caret at the end
    pub fn new(content: impl Into<String>) -> CanvasResult<Self> {
        let content = content.into();
        check_well_formed(&content).map_err(CanvasError::Malformed)?;
        let end = content.len();
        Ok(Self {
            content,
            anchor: end,
            focus: end,
            revision: 0,
            history: UndoStack::new(),
        })
    }

    pub fn with_undo_levels(mut self, levels: usize) -> Self {
        self.history = UndoStack::with_max_levels(levels);
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn anchor(&self) -> usize {
        self.anchor
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    /// The caret is the focus end of the selection
    pub fn caret(&self) -> usize {
        self.focus
    }

    /// Current selection, `None` when collapsed
    pub fn selection(&self) -> Option<Selection> {
        let (start, end) = self.selected_range()?;
        Some(Selection {
            start,
            end,
            text: self.content[start..end].to_string(),
        })
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn outline(&self) -> CanvasResult<Outline<'_>> {
        Outline::parse(&self.content).map_err(CanvasError::Malformed)
    }

    fn selected_range(&self) -> Option<(usize, usize)> {
        if self.anchor == self.focus {
            return None;
        }
        Some((self.anchor.min(self.focus), self.anchor.max(self.focus)))
    }

    fn check_offset(&self, outline: &Outline<'_>, offset: usize) -> CanvasResult<()> {
        if offset > self.content.len() {
            return Err(CanvasError::OutOfBounds {
                offset,
                len: self.content.len(),
            });
        }
        if !outline.is_boundary(offset) {
            return Err(CanvasError::NotABoundary(offset));
        }
        Ok(())
    }

    pub fn select(&mut self, anchor: usize, focus: usize) -> CanvasResult<()> {
        {
            let outline = self.outline()?;
            self.check_offset(&outline, anchor)?;
            self.check_offset(&outline, focus)?;
        }
        self.anchor = anchor;
        self.focus = focus;
        Ok(())
    }

    pub fn set_caret(&mut self, offset: usize) -> CanvasResult<()> {
        self.select(offset, offset)
    }

    /// Collapse the selection onto its focus
    pub fn clear_selection(&mut self) {
        self.anchor = self.focus;
    }

    /// Replace the whole content, dropping history
    pub fn reset(&mut self, content: impl Into<String>) -> CanvasResult<()> {
        let content = content.into();
        check_well_formed(&content).map_err(CanvasError::Malformed)?;
        self.anchor = content.len();
        self.focus = content.len();
        self.content = content;
        self.revision += 1;
        self.history.clear();
        Ok(())
    }

    /// Selection range, or the caret as an empty range
    ///
    /// A selection has to be balanced to be replaced as a whole.
    fn target_range(&self) -> CanvasResult<Range<usize>> {
        match self.selected_range() {
            Some((start, end)) => {
                if !self.outline()?.is_balanced(start..end) {
                    return Err(CanvasError::UnbalancedSelection { start, end });
                }
                Ok(start..end)
            }
            None => Ok(self.focus..self.focus),
        }
    }

    /// Replace `[start, end)` if it still holds `expected`
    pub fn replace_range(
        &mut self,
        start: usize,
        end: usize,
        expected: &str,
        fragment: &str,
    ) -> CanvasResult<Edit> {
        if self.content.get(start..end) != Some(expected) {
            return Err(CanvasError::RangeStale { start, end });
        }
        check_well_formed(fragment).map_err(CanvasError::MalformedFragment)?;
        let caret = start + fragment.len();
        self.commit(start..end, fragment.to_string(), "Replace", caret, caret)
    }

    /// Insert a complete fragment over the selection or at the caret
    pub fn insert_fragment(&mut self, fragment: &str) -> CanvasResult<Edit> {
        check_well_formed(fragment).map_err(CanvasError::MalformedFragment)?;
        let range = self.target_range()?;
        let caret = range.start + fragment.len();
        self.commit(range, fragment.to_string(), "Insert", caret, caret)
    }

    /// Type plain text over the selection or at the caret
    pub fn insert_text(&mut self, text: &str) -> CanvasResult<Option<Edit>> {
        if text.is_empty() && self.selected_range().is_none() {
            return Ok(None);
        }
        let escaped = escape_text(text);
        let range = self.target_range()?;
        let caret = range.start + escaped.len();
        self.commit(range, escaped, "Typing", caret, caret).map(Some)
    }

    /// Backspace: delete the selection, or the character or entity before
    /// the caret
    ///
    /// Does nothing at the start of the content or right after a tag.
    pub fn delete_backward(&mut self) -> CanvasResult<Option<Edit>> {
        let range = match self.selected_range() {
            Some(_) => self.target_range()?,
            None => {
                let caret = self.focus;
                let outline = self.outline()?;
                match outline.token_before(caret) {
                    Some(token) if token.kind == TokenKind::Entity => token.span.start..caret,
                    Some(token) if token.kind == TokenKind::Text => {
                        let width = self.content[..caret]
                            .chars()
                            .next_back()
                            .map(char::len_utf8)
                            .unwrap_or(0);
                        caret - width..caret
                    }
                    _ => return Ok(None),
                }
            }
        };
        let caret = range.start;
        self.commit(range, String::new(), "Delete", caret, caret).map(Some)
    }

    /// Apply or toggle an inline style over the selection
    pub fn apply_inline_style(&mut self, style: &InlineStyle) -> CanvasResult<Edit> {
        let (start, end) = self.selected_range().ok_or(CanvasError::NoSelection)?;
        let (region, text, selection) = {
            let outline = self.outline()?;
            if !outline.is_balanced(start..end) {
                return Err(CanvasError::UnbalancedSelection { start, end });
            }
            let restyled = inline::restyle(&outline, start..end, style);
            let selection = restyled.selection;
            let (region, text) = restyled.splice.into_parts();
            (region, text, selection)
        };

        let (anchor, focus) = if self.anchor <= self.focus {
            (selection.start, selection.end)
        } else {
            (selection.end, selection.start)
        };
        self.commit(region, text, style.label(), anchor, focus)
    }

    /// Change the block holding the selection start
    ///
    /// `None` when the block already has that type.
    pub fn set_block_type(&mut self, block: BlockType) -> CanvasResult<Option<Edit>> {
        let at = self.anchor.min(self.focus);
        let (region, text, anchor, focus) = {
            let outline = self.outline()?;
            let Some(splice) = block::reblock(&outline, at, block) else {
                return Ok(None);
            };
            let anchor = splice.map(self.anchor);
            let focus = splice.map(self.focus);
            let (region, text) = splice.into_parts();
            (region, text, anchor, focus)
        };
        self.commit(region, text, block.label(), anchor, focus).map(Some)
    }

    /// Revert the most recent edit; `false` when there is none
    pub fn undo(&mut self) -> bool {
        let Some(edit) = self.history.undo() else {
            return false;
        };
        let range = edit.inserted_range();
        let removed = edit.removed.clone();
        let (anchor, focus) = edit.before;

        self.content.replace_range(range, &removed);
        self.anchor = anchor;
        self.focus = focus;
        self.revision += 1;
        tracing::debug!("Undo to revision {}", self.revision);
        true
    }

    /// Reapply the most recently undone edit
    pub fn redo(&mut self) -> bool {
        let Some(edit) = self.history.redo() else {
            return false;
        };
        let range = edit.removed_range();
        let inserted = edit.inserted.clone();
        let (anchor, focus) = edit.after;

        self.content.replace_range(range, &inserted);
        self.anchor = anchor;
        self.focus = focus;
        self.revision += 1;
        tracing::debug!("Redo to revision {}", self.revision);
        true
    }

    fn commit(
        &mut self,
        region: Range<usize>,
        inserted: String,
        label: &str,
        anchor: usize,
        focus: usize,
    ) -> CanvasResult<Edit> {
        let mut candidate =
            String::with_capacity(self.content.len() - region.len() + inserted.len());
        candidate.push_str(&self.content[..region.start]);
        candidate.push_str(&inserted);
        candidate.push_str(&self.content[region.end..]);
        check_well_formed(&candidate).map_err(CanvasError::Malformed)?;

        let removed = self.content[region.clone()].to_string();
        let before = (self.anchor, self.focus);
        self.content = candidate;
        self.anchor = anchor;
        self.focus = focus;
        self.revision += 1;

        let edit = Edit {
            start: region.start,
            removed,
            inserted,
            label: label.to_string(),
            revision: self.revision,
            before,
            after: (anchor, focus),
        };
        tracing::debug!(
            "{} at {}: -{} +{} bytes, revision {}",
            label,
            edit.start,
            edit.removed.len(),
            edit.inserted.len(),
            self.revision
        );
        self.history.push(edit.clone());
        Ok(edit)
    }
}
