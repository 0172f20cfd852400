use std::fmt;
use std::str::FromStr;

use anyhow::{Result, Context, anyhow};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::errors::SubtitleError;

// @module: SRT block segmentation and timecode parsing

// @const: Single SRT timestamp. Seconds may be one digit and milliseconds two
// in some release-group files.
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{1,2}),(\d{2,3})").unwrap()
});

/// Separator between the start and end stamps of a timing line
pub const TIMING_SEPARATOR: &str = "-->";

// @struct: Instant within an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timecode {
    pub hours: u32,
    pub minutes: u8,
    pub seconds: u8,
    pub milliseconds: u16,
}

impl Timecode {
    /// Creates a timecode, rejecting out-of-range components
    pub fn new(hours: u32, minutes: u8, seconds: u8, milliseconds: u16) -> Result<Self> {
        if minutes >= 60 || seconds >= 60 || milliseconds >= 1000 {
            return Err(anyhow!(
                "Invalid time components: {}:{}:{},{}",
                hours, minutes, seconds, milliseconds
            ));
        }

        Ok(Self { hours, minutes, seconds, milliseconds })
    }

    /// Builds a timecode from a millisecond offset
    pub fn from_millis(ms: u64) -> Self {
        Self {
            hours: (ms / 3_600_000) as u32,
            minutes: ((ms % 3_600_000) / 60_000) as u8,
            seconds: ((ms % 60_000) / 1_000) as u8,
            milliseconds: (ms % 1_000) as u16,
        }
    }

    /// Total offset in milliseconds
    pub fn to_millis(&self) -> u64 {
        u64::from(self.hours) * 3_600_000
            + u64::from(self.minutes) * 60_000
            + u64::from(self.seconds) * 1_000
            + u64::from(self.milliseconds)
    }

    fn from_captures(caps: &regex::Captures) -> Result<Self> {
        let hours: u32 = caps[1].parse().context("Failed to parse hours")?;
        let minutes: u8 = caps[2].parse().context("Failed to parse minutes")?;
        let seconds: u8 = caps[3].parse().context("Failed to parse seconds")?;

        // A two-digit field is a fraction of a second, so "12" is 120 ms
        let millis_field = &caps[4];
        let mut milliseconds: u16 = millis_field.parse().context("Failed to parse milliseconds")?;
        if millis_field.len() == 2 {
            milliseconds *= 10;
        }

        Self::new(hours, minutes, seconds, milliseconds)
    }
}

impl FromStr for Timecode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let caps = TIMESTAMP_REGEX
            .captures(trimmed)
            .filter(|caps| caps.get(0).is_some_and(|m| m.as_str() == trimmed))
            .ok_or_else(|| anyhow!("Invalid timestamp format: {}", s))?;

        Self::from_captures(&caps)
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02},{:03}",
            self.hours, self.minutes, self.seconds, self.milliseconds
        )
    }
}

impl Serialize for Timecode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parses the start/end pair of an SRT timing line.
pub struct TimecodeParser;

impl TimecodeParser {
    /// Whether the line carries the timing separator
    pub fn is_timing_line(line: &str) -> bool {
        line.contains(TIMING_SEPARATOR)
    }

    /// Parse a timing line into a `(start, end)` pair.
    ///
    /// The pair is produced atomically: anything other than exactly two valid
    /// timestamps, or an end before the start, is an error and neither value
    /// is returned.
    pub fn parse_line(line: &str, line_no: usize) -> std::result::Result<(Timecode, Timecode), SubtitleError> {
        let stamps: Vec<Timecode> = TIMESTAMP_REGEX
            .captures_iter(line)
            .filter_map(|caps| Timecode::from_captures(&caps).ok())
            .collect();

        let (start, end) = match stamps.as_slice() {
            [start, end] => (*start, *end),
            _ => {
                return Err(SubtitleError::TimecodeMalformed {
                    line: line_no,
                    found: stamps.len(),
                    content: line.trim().to_string(),
                });
            }
        };

        if end < start {
            return Err(SubtitleError::InvalidTimeRange { line: line_no, start, end });
        }

        Ok((start, end))
    }
}

// @struct: One timed caption as declared in the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleBlock {
    /// Declared ordinal, kept exactly as written
    pub index: u32,
    pub start: Timecode,
    pub end: Timecode,
    /// Trimmed text lines in file order
    pub lines: Vec<String>,
}

impl SubtitleBlock {
    /// Text lines joined with single spaces
    pub fn text(&self) -> String {
        self.lines.join(" ")
    }
}

/// Block that has an index and timing and is collecting text lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBlock {
    pub index: u32,
    pub start: Timecode,
    pub end: Timecode,
    pub lines: Vec<String>,
}

impl PendingBlock {
    fn new(index: u32, start: Timecode, end: Timecode) -> Self {
        Self { index, start, end, lines: Vec::new() }
    }

    /// Close the block. A block without text is discarded rather than emitted.
    fn close(self) -> BlockEvent {
        if self.lines.is_empty() {
            BlockEvent::Discarded { index: self.index }
        } else {
            BlockEvent::Emitted(SubtitleBlock {
                index: self.index,
                start: self.start,
                end: self.end,
                lines: self.lines,
            })
        }
    }
}

/// State of the block segmentation state machine
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParserState {
    #[default]
    AwaitingIndex,
    AwaitingTimecode { index: u32 },
    AccumulatingText(PendingBlock),
    /// A block was rejected; lines are ignored until the next blank line
    SkippingBlock,
}

/// Something the parser produced while consuming a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockEvent {
    /// A complete block with text
    Emitted(SubtitleBlock),
    /// A block was dropped because it was structurally invalid
    Rejected(SubtitleError),
    /// A well-formed block with no text; routine, not an error
    Discarded { index: u32 },
    /// A text line outside of any block
    Stray { line: usize },
}

/// Result of feeding one line to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: ParserState,
    pub events: Vec<BlockEvent>,
}

impl Transition {
    fn to(state: ParserState) -> Self {
        Self { state, events: Vec::new() }
    }

    fn with(state: ParserState, event: BlockEvent) -> Self {
        Self { state, events: vec![event] }
    }
}

/// Everything recovered from one file
#[derive(Debug, Clone, Default)]
pub struct ParsedBlocks {
    pub blocks: Vec<SubtitleBlock>,
    pub rejected: Vec<SubtitleError>,
    pub discarded: usize,
    pub stray_lines: usize,
}

/// Segments a decoded line stream into subtitle blocks.
///
/// The machine is a pure function of `(state, line)`, so it can be driven
/// one line at a time. A block is only emitted on an unambiguous boundary:
/// a blank line, end of input, or an index line directly followed by a
/// timing line.
pub struct BlockParser;

impl BlockParser {
    /// Consume one line. `line_no` is 1-based and only used for diagnostics.
    pub fn step(state: ParserState, line_no: usize, line: &str) -> Transition {
        let trimmed = line.trim();

        match state {
            ParserState::AwaitingIndex => {
                if trimmed.is_empty() {
                    Transition::to(ParserState::AwaitingIndex)
                } else if let Some(index) = parse_index(trimmed) {
                    Transition::to(ParserState::AwaitingTimecode { index })
                } else if TimecodeParser::is_timing_line(trimmed) {
                    Transition::with(
                        ParserState::SkippingBlock,
                        BlockEvent::Rejected(SubtitleError::MissingIndex { line: line_no }),
                    )
                } else {
                    Transition::with(ParserState::AwaitingIndex, BlockEvent::Stray { line: line_no })
                }
            }

            ParserState::AwaitingTimecode { index } => {
                if TimecodeParser::is_timing_line(trimmed) {
                    match TimecodeParser::parse_line(trimmed, line_no) {
                        Ok((start, end)) => Transition::to(ParserState::AccumulatingText(
                            PendingBlock::new(index, start, end),
                        )),
                        Err(e) => Transition::with(ParserState::SkippingBlock, BlockEvent::Rejected(e)),
                    }
                } else {
                    let rejected = BlockEvent::Rejected(SubtitleError::MissingTimecode { line: line_no, index });
                    if trimmed.is_empty() {
                        Transition::with(ParserState::AwaitingIndex, rejected)
                    } else if let Some(next_index) = parse_index(trimmed) {
                        Transition::with(ParserState::AwaitingTimecode { index: next_index }, rejected)
                    } else {
                        Transition::with(ParserState::SkippingBlock, rejected)
                    }
                }
            }

            ParserState::AccumulatingText(mut pending) => {
                if trimmed.is_empty() {
                    if pending.lines.is_empty() {
                        // Duplicate blank line before any text
                        return Transition::to(ParserState::AccumulatingText(pending));
                    }
                    return Transition::with(ParserState::AwaitingIndex, pending.close());
                }

                if TimecodeParser::is_timing_line(trimmed) {
                    return Self::timing_inside_block(pending, line_no, trimmed);
                }

                pending.lines.push(trimmed.to_string());
                Transition::to(ParserState::AccumulatingText(pending))
            }

            ParserState::SkippingBlock => {
                if trimmed.is_empty() {
                    Transition::to(ParserState::AwaitingIndex)
                } else {
                    Transition::to(ParserState::SkippingBlock)
                }
            }
        }
    }

    /// A timing line while collecting text means the blank separator was
    /// missing. If the previous line was an index it starts the next block.
    fn timing_inside_block(mut pending: PendingBlock, line_no: usize, line: &str) -> Transition {
        let next_index = pending.lines.last().and_then(|last| parse_index(last));

        let parsed = TimecodeParser::parse_line(line, line_no);
        if next_index.is_none() && parsed.is_err() {
            // Not a real timing line, just dialogue that contains an arrow
            pending.lines.push(line.to_string());
            return Transition::to(ParserState::AccumulatingText(pending));
        }

        if next_index.is_some() {
            pending.lines.pop();
        }
        let mut events = vec![pending.close()];

        let state = match (next_index, parsed) {
            (Some(index), Ok((start, end))) => {
                ParserState::AccumulatingText(PendingBlock::new(index, start, end))
            }
            (Some(_), Err(e)) => {
                events.push(BlockEvent::Rejected(e));
                ParserState::SkippingBlock
            }
            (None, _) => {
                events.push(BlockEvent::Rejected(SubtitleError::MissingIndex { line: line_no }));
                ParserState::SkippingBlock
            }
        };

        Transition { state, events }
    }

    /// Flush whatever is left at end of input
    pub fn finish(state: ParserState, line_no: usize) -> Option<BlockEvent> {
        match state {
            ParserState::AccumulatingText(pending) => Some(pending.close()),
            ParserState::AwaitingTimecode { index } => {
                Some(BlockEvent::Rejected(SubtitleError::MissingTimecode { line: line_no, index }))
            }
            ParserState::AwaitingIndex | ParserState::SkippingBlock => None,
        }
    }

    /// Parse a whole decoded file
    pub fn parse(content: &str) -> ParsedBlocks {
        let mut parsed = ParsedBlocks::default();
        let mut state = ParserState::default();
        let mut line_count = 0;

        for (i, line) in content.trim_start_matches('\u{feff}').lines().enumerate() {
            line_count = i + 1;
            let transition = Self::step(state, line_count, line);
            state = transition.state;
            for event in transition.events {
                Self::collect(&mut parsed, event);
            }
        }

        if let Some(event) = Self::finish(state, line_count + 1) {
            Self::collect(&mut parsed, event);
        }

        parsed
    }

    fn collect(parsed: &mut ParsedBlocks, event: BlockEvent) {
        match event {
            BlockEvent::Emitted(block) => parsed.blocks.push(block),
            BlockEvent::Rejected(e) => {
                warn!("Skipping subtitle block: {}", e);
                parsed.rejected.push(e);
            }
            BlockEvent::Discarded { index } => {
                debug!("Block {} has no text, discarded", index);
                parsed.discarded += 1;
            }
            BlockEvent::Stray { line } => {
                warn!("Unexpected text at line {} outside of a subtitle block", line);
                parsed.stray_lines += 1;
            }
        }
    }
}

// Digits-only line that fits a block index
fn parse_index(trimmed: &str) -> Option<u32> {
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}
