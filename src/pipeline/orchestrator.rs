/*!
 * Pipeline orchestrator for turning subtitle files into dialogue rows.
 *
 * Per file:
 * 1. Episode metadata from the filename (a mismatch skips the file)
 * 2. Encoding detection and decoding
 * 3. Block segmentation
 * 4. Dialogue stages
 *
 * Files are independent of each other. A failure in one file is recorded
 * in the batch report and never stops the rest of the batch.
 */

use std::path::Path;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::app_config::Config;
use crate::dialogue::{DialogueExtractor, DialogueRow, ExtractionStats};
use crate::encoding::{EncodingDetector, EncodingGuess};
use crate::episode::EpisodeMetadataExtractor;
use crate::errors::{AppError, SubtitleError};
use crate::file_utils::FileManager;
use crate::subtitle_processor::BlockParser;

use super::dataset::Dataset;
use super::report::{BatchReport, FileOutcome, FileStatus, PipelineWarning};

/// Everything produced from one file
#[derive(Debug, Clone)]
pub struct FileResult {
    pub rows: Vec<DialogueRow>,
    pub stats: ExtractionStats,
    /// Blocks that survived segmentation
    pub blocks: usize,
    pub rejected: Vec<SubtitleError>,
    pub encoding: EncodingGuess,
    pub warnings: Vec<PipelineWarning>,
}

/// Rows and report of a batch run
#[derive(Debug, Default)]
pub struct BatchOutput {
    pub dataset: Dataset,
    pub report: BatchReport,
}

/// Sequences the extraction stages for each input file
#[derive(Debug, Clone)]
pub struct PipelineOrchestrator {
    detector: EncodingDetector,
    min_confidence: f32,
    metadata: EpisodeMetadataExtractor,
    extractor: DialogueExtractor,
}

impl Default for PipelineOrchestrator {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl PipelineOrchestrator {
    pub fn new(config: &Config) -> Self {
        Self {
            detector: EncodingDetector::new(config.encoding.sample_size),
            min_confidence: config.encoding.min_confidence,
            metadata: EpisodeMetadataExtractor::new(config.episode.series_title.as_deref()),
            extractor: DialogueExtractor::new(&config.dialogue),
        }
    }

    /// Process already-loaded file content. `filename` is the bare name the
    /// episode metadata is read from.
    pub fn process_content(&self, filename: &str, bytes: &[u8]) -> Result<FileResult, AppError> {
        let episode = Arc::new(self.metadata.extract(filename)?);
        let mut warnings = Vec::new();

        let decoded = self.detector.decode(bytes);
        if decoded.guess.is_ambiguous(self.min_confidence) {
            warn!(
                "{}: low confidence encoding guess {} ({:.2}), decoding anyway",
                filename,
                decoded.guess.label(),
                decoded.guess.confidence
            );
            warnings.push(PipelineWarning::EncodingAmbiguous {
                file: filename.to_string(),
                encoding: decoded.guess.label(),
                confidence: decoded.guess.confidence,
            });
        }
        if decoded.had_errors {
            warnings.push(PipelineWarning::DecodeErrors {
                file: filename.to_string(),
                encoding: decoded.guess.label(),
            });
        }

        let parsed = BlockParser::parse(&decoded.text);
        warnings.extend(parsed.rejected.iter().map(|error| PipelineWarning::BlockRejected {
            file: filename.to_string(),
            error: error.clone(),
        }));

        let blocks = parsed.blocks.len();
        let (rows, stats) = self.extractor.extract(parsed.blocks, episode);

        Ok(FileResult {
            rows,
            stats,
            blocks,
            rejected: parsed.rejected,
            encoding: decoded.guess,
            warnings,
        })
    }

    /// Read and process one file
    pub fn process_file<P: AsRef<Path>>(&self, path: P) -> Result<FileResult, AppError> {
        let path = path.as_ref();
        let filename = FileManager::file_name(path)
            .ok_or_else(|| AppError::File(format!("Path has no file name: {}", path.display())))?;

        let bytes = FileManager::read_bytes(path)
            .map_err(|e| AppError::File(format!("{:#}", e)))?;
        self.process_content(&filename, &bytes)
    }

    /// Process every path and concatenate the rows
    pub fn run<I, P>(&self, paths: I) -> BatchOutput
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.run_with_observer(paths, |_| {})
    }

    /// Like `run`, calling `observer` after each file
    pub fn run_with_observer<I, P, F>(&self, paths: I, mut observer: F) -> BatchOutput
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
        F: FnMut(&FileOutcome),
    {
        let mut output = BatchOutput::default();

        for path in paths {
            let path = path.as_ref();

            let status = match self.process_file(path) {
                Ok(result) => {
                    info!(
                        "{}: {} rows from {} blocks ({})",
                        path.display(),
                        result.rows.len(),
                        result.blocks,
                        result.encoding.label()
                    );
                    let status = FileStatus::Processed {
                        rows: result.rows.len(),
                        blocks: result.blocks,
                        rejected_blocks: result.rejected.len(),
                        encoding: result.encoding.label(),
                    };
                    output.dataset.extend(result.rows);
                    output.report.warnings.extend(result.warnings);
                    status
                }
                Err(e) => {
                    debug!("Skipping {}: {}", path.display(), e);
                    FileStatus::Skipped(e)
                }
            };

            let outcome = FileOutcome { path: path.to_path_buf(), status };
            observer(&outcome);
            output.report.outcomes.push(outcome);
        }

        output
    }
}
