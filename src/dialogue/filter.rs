//! Row filtering: styled non-dialogue captions and empty fragments.

use super::{Caption, DialogueRow};

/// Drops rows that are not dialogue
#[derive(Debug, Clone)]
pub struct RowFilter {
    styling: LiteralMarker,
}

impl RowFilter {
    /// `styling_marker` is matched literally and case-insensitively, e.g. `<font`
    pub fn new(styling_marker: &str) -> Self {
        Self { styling: LiteralMarker::new(styling_marker) }
    }

    /// Whether the raw caption carries the styling marker
    pub fn is_styled(&self, fulltext: &str) -> bool {
        self.styling.is_in(fulltext)
    }

    /// Keep captions without the styling marker. Returns the number dropped.
    pub fn retain_unstyled(&self, captions: Vec<Caption>) -> (Vec<Caption>, usize) {
        let before = captions.len();
        let kept: Vec<Caption> = captions
            .into_iter()
            .filter(|c| !self.is_styled(&c.fulltext))
            .collect();
        let dropped = before - kept.len();
        (kept, dropped)
    }

    /// Keep rows whose text has something besides whitespace
    pub fn retain_non_empty(rows: Vec<DialogueRow>) -> (Vec<DialogueRow>, usize) {
        let before = rows.len();
        let kept: Vec<DialogueRow> = rows
            .into_iter()
            .filter(|r| !r.text.trim().is_empty())
            .collect();
        let dropped = before - kept.len();
        (kept, dropped)
    }
}

/// Case-insensitive literal marker such as `<font` or `<i>`
#[derive(Debug, Clone)]
pub(crate) struct LiteralMarker {
    lowered: String,
}

impl LiteralMarker {
    pub(crate) fn new(marker: &str) -> Self {
        Self { lowered: marker.to_lowercase() }
    }

    pub(crate) fn is_in(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.lowered)
    }
}
