/*!
 * Dialogue extraction stages.
 *
 * Turns the blocks of one episode into dialogue rows by running a fixed
 * chain of stages:
 * 1. `filter`: drop styled credit/watermark captions
 * 2. `offscreen`: flag italic captions as off-screen speech
 * 3. `splitter`: explode captions that carry several speakers
 * 4. `markup`: strip inline tags from each fragment
 * 5. `speakers`: attribute a speaker from a leading `NAME:` label
 * 6. `filter`: drop fragments that ended up empty
 *
 * The order matters: the off-screen flag reads the tags that the stripper
 * removes later.
 */

pub mod filter;
pub mod markup;
pub mod offscreen;
pub mod speakers;
pub mod splitter;

use std::sync::Arc;

use log::debug;

use crate::app_config::DialogueConfig;
use crate::episode::EpisodeMetadata;
use crate::subtitle_processor::{SubtitleBlock, Timecode};

pub use filter::RowFilter;
pub use markup::HtmlStripper;
pub use offscreen::OffscreenMarker;
pub use speakers::SpeakerAttributor;
pub use splitter::MultiSpeakerSplitter;

/// One caption between block parsing and speaker splitting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub subtitle_index: u32,
    pub start: Timecode,
    pub end: Timecode,
    /// Block text lines joined with spaces, markup still in place
    pub fulltext: String,
    pub offscreen: bool,
}

impl From<SubtitleBlock> for Caption {
    fn from(block: SubtitleBlock) -> Self {
        let fulltext = block.text();
        Self {
            subtitle_index: block.index,
            start: block.start,
            end: block.end,
            fulltext,
            offscreen: false,
        }
    }
}

/// Final record: one attributed dialogue fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueRow {
    pub subtitle_index: u32,
    pub start: Timecode,
    pub end: Timecode,
    /// Caption text before any speaker split
    pub fulltext: String,
    /// The fragment this row is about, markup removed
    pub text: String,
    pub offscreen: bool,
    pub speaker: Option<String>,
    pub episode: Arc<EpisodeMetadata>,
}

/// Counters for one extraction run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub captions: usize,
    pub styled_dropped: usize,
    pub empty_dropped: usize,
    pub rows: usize,
}

/// Runs the dialogue stages over the blocks of one episode
#[derive(Debug, Clone)]
pub struct DialogueExtractor {
    filter: RowFilter,
    offscreen: OffscreenMarker,
    splitter: MultiSpeakerSplitter,
    stripper: HtmlStripper,
    attributor: SpeakerAttributor,
}

impl Default for DialogueExtractor {
    fn default() -> Self {
        Self::new(&DialogueConfig::default())
    }
}

impl DialogueExtractor {
    pub fn new(config: &DialogueConfig) -> Self {
        Self {
            filter: RowFilter::new(&config.styling_marker),
            offscreen: OffscreenMarker::new(&config.italic_marker),
            splitter: MultiSpeakerSplitter::new(&config.speaker_delimiter),
            stripper: HtmlStripper::new(),
            attributor: SpeakerAttributor::new(config.max_speaker_tokens),
        }
    }

    /// Build the rows for one episode. Rows keep block order, and fragments
    /// of a block keep split order.
    pub fn extract(
        &self,
        blocks: Vec<SubtitleBlock>,
        episode: Arc<EpisodeMetadata>,
    ) -> (Vec<DialogueRow>, ExtractionStats) {
        let mut stats = ExtractionStats { captions: blocks.len(), ..Default::default() };

        let captions: Vec<Caption> = blocks.into_iter().map(Caption::from).collect();
        let (mut captions, styled) = self.filter.retain_unstyled(captions);
        stats.styled_dropped = styled;

        for caption in captions.iter_mut() {
            self.offscreen.mark(caption);
        }

        let mut rows: Vec<DialogueRow> = captions
            .iter()
            .flat_map(|caption| self.splitter.explode(caption, &episode))
            .collect();

        for row in rows.iter_mut() {
            row.text = self.stripper.strip(&row.text);
            row.speaker = self.attributor.attribute(&row.text);
        }

        let (rows, empty) = RowFilter::retain_non_empty(rows);
        stats.empty_dropped = empty;
        stats.rows = rows.len();

        debug!(
            "{}: {} captions, {} styled dropped, {} empty dropped, {} rows",
            episode.source_filename, stats.captions, stats.styled_dropped, stats.empty_dropped, stats.rows
        );

        (rows, stats)
    }
}
