/*!
 * Per-file outcomes and the batch summary.
 */

use std::fmt;
use std::path::PathBuf;

use crate::errors::{AppError, SubtitleError};

/// Non-fatal conditions met while processing a file
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineWarning {
    /// The encoding guess was below the configured confidence
    EncodingAmbiguous {
        file: String,
        encoding: &'static str,
        confidence: f32,
    },
    /// Decoding replaced malformed byte sequences
    DecodeErrors { file: String, encoding: &'static str },
    /// A block was dropped; the rest of the file was kept
    BlockRejected { file: String, error: SubtitleError },
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EncodingAmbiguous { file, encoding, confidence } => write!(
                f,
                "{}: encoding guessed as {} with low confidence ({:.2})",
                file, encoding, confidence
            ),
            Self::DecodeErrors { file, encoding } => {
                write!(f, "{}: malformed bytes replaced while decoding as {}", file, encoding)
            }
            Self::BlockRejected { file, error } => write!(f, "{}: {}", file, error),
        }
    }
}

/// What happened to one input file
#[derive(Debug)]
pub enum FileStatus {
    Processed {
        rows: usize,
        blocks: usize,
        rejected_blocks: usize,
        encoding: &'static str,
    },
    /// The file contributed no rows
    Skipped(AppError),
}

#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub status: FileStatus,
}

impl FileOutcome {
    pub fn is_processed(&self) -> bool {
        matches!(self.status, FileStatus::Processed { .. })
    }
}

/// Outcome of a whole batch
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
    pub warnings: Vec<PipelineWarning>,
}

impl BatchReport {
    pub fn processed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_processed()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.processed_count()
    }

    pub fn total_rows(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o.status {
                FileStatus::Processed { rows, .. } => rows,
                FileStatus::Skipped(_) => 0,
            })
            .sum()
    }

    pub fn rejected_blocks(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o.status {
                FileStatus::Processed { rejected_blocks, .. } => rejected_blocks,
                FileStatus::Skipped(_) => 0,
            })
            .sum()
    }

    /// Skipped files with their reasons
    pub fn failures(&self) -> impl Iterator<Item = (&PathBuf, &AppError)> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            FileStatus::Skipped(e) => Some((&o.path, e)),
            FileStatus::Processed { .. } => None,
        })
    }

    pub fn has_failures(&self) -> bool {
        self.skipped_count() > 0
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Files processed: {}", self.processed_count())?;
        writeln!(f, "Files skipped: {}", self.skipped_count())?;
        writeln!(f, "Rows: {}", self.total_rows())?;
        writeln!(f, "Blocks rejected: {}", self.rejected_blocks())?;
        write!(f, "Warnings: {}", self.warnings.len())
    }
}
