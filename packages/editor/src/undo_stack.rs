//! # Undo/Redo Stack
//!
//! Tracks committed canvas edits and replays them backwards or forwards.
//!
//! ## Design
//!
//! - Every commit records one [`Edit`]: the splice position, the removed
//!   text and the inserted text
//! - Undo splices `removed` back over `inserted` and moves the edit to the
//!   redo stack
//! - Redo splices `inserted` over `removed` again
//! - New edits clear the redo stack

use crate::canvas::Edit;

/// Undo/redo stack for canvas editing
#[derive(Debug)]
pub struct UndoStack {
    /// Applied edits (most recent last)
    undo_stack: Vec<Edit>,

    /// Undone edits (most recent last)
    redo_stack: Vec<Edit>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Record a freshly committed edit
    pub fn push(&mut self, edit: Edit) {
        self.undo_stack.push(edit);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // New action invalidates future
        self.redo_stack.clear();
    }

    /// Move the most recent edit to the redo stack and return it
    pub fn undo(&mut self) -> Option<&Edit> {
        let edit = self.undo_stack.pop()?;
        self.redo_stack.push(edit);
        self.redo_stack.last()
    }

    /// Move the most recently undone edit back and return it
    pub fn redo(&mut self) -> Option<&Edit> {
        let edit = self.redo_stack.pop()?;
        self.undo_stack.push(edit);
        self.undo_stack.last()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Label of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|edit| edit.label.as_str())
    }

    /// Label of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|edit| edit.label.as_str())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
