//! Multi-speaker captions. A caption such as `- Hi! - Hello yourself.` holds
//! two speakers' lines; each becomes its own row with the caption's timing.

use std::sync::Arc;

use super::{Caption, DialogueRow};
use crate::episode::EpisodeMetadata;

#[derive(Debug, Clone)]
pub struct MultiSpeakerSplitter {
    delimiter: String,
}

impl MultiSpeakerSplitter {
    pub fn new(delimiter: &str) -> Self {
        Self { delimiter: delimiter.to_string() }
    }

    /// Trimmed, non-empty fragments of `text` in order
    pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        if self.delimiter.is_empty() {
            let whole = text.trim();
            return if whole.is_empty() { Vec::new() } else { vec![whole] };
        }

        text.split(self.delimiter.as_str())
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty())
            .collect()
    }

    /// One row per fragment, all sharing the caption's index, timing,
    /// off-screen flag and full text
    pub fn explode(&self, caption: &Caption, episode: &Arc<EpisodeMetadata>) -> Vec<DialogueRow> {
        self.split(&caption.fulltext)
            .into_iter()
            .map(|fragment| DialogueRow {
                subtitle_index: caption.subtitle_index,
                start: caption.start,
                end: caption.end,
                fulltext: caption.fulltext.clone(),
                text: fragment.to_string(),
                offscreen: caption.offscreen,
                speaker: None,
                episode: Arc::clone(episode),
            })
            .collect()
    }
}
