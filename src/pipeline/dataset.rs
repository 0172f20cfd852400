use std::collections::{HashMap, HashSet};

use crate::dialogue::DialogueRow;

/// Concatenated rows of every processed file
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<DialogueRow>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<DialogueRow>) -> Self {
        Self { rows }
    }

    /// Append one file's rows, keeping their order
    pub fn extend(&mut self, rows: Vec<DialogueRow>) {
        self.rows.extend(rows);
    }

    pub fn rows(&self) -> &[DialogueRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<DialogueRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn offscreen_count(&self) -> usize {
        self.rows.iter().filter(|r| r.offscreen).count()
    }

    pub fn attributed_count(&self) -> usize {
        self.rows.iter().filter(|r| r.speaker.is_some()).count()
    }

    pub fn distinct_speakers(&self) -> usize {
        self.rows
            .iter()
            .filter_map(|r| r.speaker.as_deref())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Rows per speaker, most frequent first, ties by name
    pub fn speaker_counts(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for speaker in self.rows.iter().filter_map(|r| r.speaker.as_deref()) {
            *counts.entry(speaker).or_insert(0) += 1;
        }

        let mut sorted: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        sorted
    }
}
