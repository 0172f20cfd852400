/*!
 * Error types for the subtitle-dialogue pipeline.
 *
 * This module contains custom error types for the different stages of the
 * pipeline, using the thiserror crate for ergonomic error definitions.
 * Per-block and per-file failures are plain values so the orchestrator can
 * decide between skipping and aborting in one place.
 */

use thiserror::Error;

use crate::subtitle_processor::Timecode;

/// Errors that can occur while segmenting a subtitle file into blocks.
///
/// Every variant is fatal for one block only; the parser carries on with the
/// rest of the file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubtitleError {
    /// A timing line did not yield exactly two timestamps
    #[error("Malformed timecode at line {line}: expected 2 timestamps, found {found} in '{content}'")]
    TimecodeMalformed {
        /// 1-based line number in the decoded file
        line: usize,
        /// Number of timestamps actually matched
        found: usize,
        /// The offending line
        content: String,
    },

    /// The end timestamp precedes the start timestamp
    #[error("Invalid time range at line {line}: end {end} is before start {start}")]
    InvalidTimeRange {
        line: usize,
        start: Timecode,
        end: Timecode,
    },

    /// An index line was followed by something other than a timing line
    #[error("Block {index} has no timing line (line {line})")]
    MissingTimecode { line: usize, index: u32 },

    /// A timing line appeared without a preceding index line
    #[error("Timing line without a block index at line {line}")]
    MissingIndex { line: usize },
}

impl SubtitleError {
    /// Line number the error was detected on
    pub fn line(&self) -> usize {
        match self {
            Self::TimecodeMalformed { line, .. }
            | Self::InvalidTimeRange { line, .. }
            | Self::MissingTimecode { line, .. }
            | Self::MissingIndex { line } => *line,
        }
    }
}

/// Errors raised while deriving episode metadata from a filename
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EpisodeError {
    /// The filename does not follow `<title> - <season>x<episode> - <name>.<suffix>.srt`
    #[error("Filename does not match the episode naming convention: {filename}")]
    FilenameFormatMismatch { filename: String },
}

/// Errors caused by invalid configuration values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Configuration value '{field}' must not be empty")]
    EmptyValue { field: &'static str },

    #[error("Configuration value '{field}' is out of range: {message}")]
    OutOfRange { field: &'static str, message: String },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from block segmentation
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from filename parsing
    #[error("Episode error: {0}")]
    Episode(#[from] EpisodeError),

    /// Error from configuration validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error while writing the dataset
    #[error("Output error: {0}")]
    Output(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(error: csv::Error) -> Self {
        Self::Output(error.to_string())
    }
}
