//! Deterministic rewriter used by the demo server and the CLI

use async_trait::async_trait;

use super::service::{RewriteService, RewriteServiceError};

/// Commands offered in the rewrite dialog, in display order
pub const PRESET_COMMANDS: [&str; 3] = ["improve grammar", "summarize", "make concise"];

const SUMMARY_CHARS: usize = 50;
const CONCISE_CHARS: usize = 70;

/// Tags the input with the kind of rewrite the command asked for
#[derive(Debug, Default, Clone, Copy)]
pub struct CannedRewriter;

impl CannedRewriter {
    pub fn new() -> Self {
        Self
    }

    pub fn apply(&self, text: &str, command: &str) -> String {
        let command = command.to_lowercase();

        if command.contains("summarize") {
            return format!("[AI Summary]: {}...", prefix(text, SUMMARY_CHARS));
        }
        if command.contains("improve grammar") {
            return format!("[AI Grammar Improved]: {}", text);
        }
        if command.contains("make concise") {
            return format!("[AI Concise]: {}...", prefix(text, CONCISE_CHARS));
        }
        format!("[AI Enhanced]: {}", text)
    }
}

fn prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[async_trait]
impl RewriteService for CannedRewriter {
    async fn rewrite(&self, text: &str, command: &str) -> Result<String, RewriteServiceError> {
        Ok(self.apply(text, command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_truncates_to_fifty_chars() {
        let text = "a".repeat(80);
        let out = CannedRewriter::new().apply(&text, "Summarize");
        assert_eq!(out, format!("[AI Summary]: {}...", "a".repeat(50)));
    }

    #[test]
    fn test_short_text_is_not_padded() {
        assert_eq!(
            CannedRewriter::new().apply("short", "make concise please"),
            "[AI Concise]: short..."
        );
    }

    #[test]
    fn test_grammar_and_default_keep_full_text() {
        let rewriter = CannedRewriter::new();
        assert_eq!(
            rewriter.apply("teh cat", "improve grammar"),
            "[AI Grammar Improved]: teh cat"
        );
        assert_eq!(rewriter.apply("teh cat", "translate"), "[AI Enhanced]: teh cat");
    }

    #[test]
    fn test_prefix_counts_chars_not_bytes() {
        assert_eq!(prefix("ééé", 2), "éé");
    }
}
