use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for one editing session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Delay between a selection gesture ending and the selection being read
    #[serde(default = "default_selection_debounce_ms")]
    pub selection_debounce_ms: u64,

    /// Upper bound on one rewrite call
    #[serde(default = "default_rewrite_timeout_ms")]
    pub rewrite_timeout_ms: u64,

    /// Undo depth (0 = unlimited)
    #[serde(default = "default_undo_levels")]
    pub undo_levels: usize,
}

fn default_selection_debounce_ms() -> u64 {
    10
}

fn default_rewrite_timeout_ms() -> u64 {
    30_000
}

fn default_undo_levels() -> usize {
    100
}

impl EditorConfig {
    pub fn selection_debounce(&self) -> Duration {
        Duration::from_millis(self.selection_debounce_ms)
    }

    pub fn rewrite_timeout(&self) -> Duration {
        Duration::from_millis(self.rewrite_timeout_ms)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            selection_debounce_ms: default_selection_debounce_ms(),
            rewrite_timeout_ms: default_rewrite_timeout_ms(),
            undo_levels: default_undo_levels(),
        }
    }
}
