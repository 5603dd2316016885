//! Selection snapshots and the debounced selection-change tracker.

use std::ops::Range;
use std::time::{Duration, Instant};

use folio_markup::text_content;
use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;

/// Immutable capture of a selection at one canvas revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    pub anchor: usize,
    pub focus: usize,
    pub start: usize,
    pub end: usize,
    /// Raw content slice at capture time
    pub text: String,
    pub revision: u64,
}

impl SelectionSnapshot {
    /// Capture the canvas selection, `None` when nothing visible is selected
    pub fn capture(canvas: &Canvas) -> Option<Self> {
        let selection = canvas.selection()?;
        if text_content(&selection.text).trim().is_empty() {
            return None;
        }
        Some(Self {
            anchor: canvas.anchor(),
            focus: canvas.focus(),
            start: selection.start,
            end: selection.end,
            text: selection.text,
            revision: canvas.revision(),
        })
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Visible text, the part a rewrite service sees
    pub fn plain_text(&self) -> String {
        text_content(&self.text)
    }

    /// Whether the captured range still holds the captured text
    pub fn is_current(&self, canvas: &Canvas) -> bool {
        canvas.content().get(self.range()) == Some(self.text.as_str())
    }
}

/// Result of a settled selection change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionUpdate {
    Held(SelectionSnapshot),
    Cleared,
}

/// Debounces pointer-up and key-up events before reading the selection
///
/// Reading right away can observe a half-finished gesture, so the read
/// happens once no new event has arrived for the debounce interval.
#[derive(Debug, Clone)]
pub struct SelectionTracker {
    debounce: Duration,
    due: Option<Instant>,
}

impl SelectionTracker {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            due: None,
        }
    }

    /// A selection-changing gesture ended at `now`
    pub fn note_event(&mut self, now: Instant) {
        self.due = Some(now + self.debounce);
    }

    pub fn is_waiting(&self) -> bool {
        self.due.is_some()
    }

    /// Read the selection once the debounce interval has passed
    pub fn poll(&mut self, canvas: &Canvas, now: Instant) -> Option<SelectionUpdate> {
        let due = self.due?;
        if now < due {
            return None;
        }
        self.due = None;

        let update = match SelectionSnapshot::capture(canvas) {
            Some(snapshot) => {
                tracing::debug!("Selection captured at {}..{}", snapshot.start, snapshot.end);
                SelectionUpdate::Held(snapshot)
            }
            None => SelectionUpdate::Cleared,
        };
        Some(update)
    }
}

impl Default for SelectionTracker {
    fn default() -> Self {
        Self::new(Duration::from_millis(10))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_ignores_blank_selections() {
        let mut canvas = Canvas::new("<p>a   b</p>").unwrap();
        canvas.select(4, 7).unwrap();
        assert!(SelectionSnapshot::capture(&canvas).is_none());

        canvas.select(3, 8).unwrap();
        let snapshot = SelectionSnapshot::capture(&canvas).unwrap();
        assert_eq!(snapshot.text, "a   b");
        assert_eq!(snapshot.revision, 0);
    }

    #[test]
    fn test_plain_text_drops_markup() {
        let mut canvas = Canvas::new("<p><strong>Tom</strong> &amp; Jerry</p>").unwrap();
        canvas.select(3, 35).unwrap();
        let snapshot = SelectionSnapshot::capture(&canvas).unwrap();
        assert_eq!(snapshot.plain_text(), "Tom & Jerry");
    }

    #[test]
    fn test_snapshot_goes_stale_when_range_changes() {
        let mut canvas = Canvas::new("<p>hello world</p>").unwrap();
        canvas.select(9, 14).unwrap();
        let snapshot = SelectionSnapshot::capture(&canvas).unwrap();
        assert!(snapshot.is_current(&canvas));

        canvas.set_caret(3).unwrap();
        canvas.insert_text("x").unwrap();
        assert!(!snapshot.is_current(&canvas));
    }

    #[test]
    fn test_tracker_waits_for_debounce() {
        let mut canvas = Canvas::new("<p>hello</p>").unwrap();
        canvas.select(3, 8).unwrap();
        let mut tracker = SelectionTracker::new(Duration::from_millis(10));
        let start = Instant::now();

        assert_eq!(tracker.poll(&canvas, start), None);

        tracker.note_event(start);
        assert_eq!(tracker.poll(&canvas, start + Duration::from_millis(5)), None);
        assert!(matches!(
            tracker.poll(&canvas, start + Duration::from_millis(10)),
            Some(SelectionUpdate::Held(_))
        ));
        assert!(!tracker.is_waiting());
    }

    #[test]
    fn test_tracker_reports_cleared_selection() {
        let canvas = Canvas::new("<p>hello</p>").unwrap();
        let mut tracker = SelectionTracker::default();
        let start = Instant::now();
        tracker.note_event(start);

        assert_eq!(
            tracker.poll(&canvas, start + Duration::from_millis(20)),
            Some(SelectionUpdate::Cleared)
        );
    }
}
