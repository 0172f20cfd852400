/*!
 * Dataset writer.
 *
 * Serializes dialogue rows as CSV (with a header row) or JSON Lines.
 * The file is first written to a temporary file next to the destination and
 * then moved into place, so an interrupted run never leaves a half-written
 * dataset behind.
 */

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::app_config::OutputFormat;
use crate::dialogue::DialogueRow;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::subtitle_processor::Timecode;

/// Column order of the written dataset
pub const COLUMNS: [&str; 11] = [
    "subtitle_index",
    "start",
    "end",
    "fulltext",
    "text",
    "offscreen",
    "speaker",
    "season_num",
    "episode_num",
    "episode_name",
    "filename",
];

/// Flat view of a row; field order must follow `COLUMNS`
#[derive(Debug, Serialize)]
pub struct DatasetRecord<'a> {
    pub subtitle_index: u32,
    pub start: Timecode,
    pub end: Timecode,
    pub fulltext: &'a str,
    pub text: &'a str,
    pub offscreen: bool,
    pub speaker: Option<&'a str>,
    pub season_num: u32,
    pub episode_num: u32,
    pub episode_name: &'a str,
    pub filename: &'a str,
}

impl<'a> From<&'a DialogueRow> for DatasetRecord<'a> {
    fn from(row: &'a DialogueRow) -> Self {
        Self {
            subtitle_index: row.subtitle_index,
            start: row.start,
            end: row.end,
            fulltext: &row.fulltext,
            text: &row.text,
            offscreen: row.offscreen,
            speaker: row.speaker.as_deref(),
            season_num: row.episode.season_num,
            episode_num: row.episode.episode_num,
            episode_name: &row.episode.episode_name,
            filename: &row.episode.source_filename,
        }
    }
}

/// Writes a dataset to one destination file
#[derive(Debug, Clone)]
pub struct DatasetWriter {
    path: PathBuf,
    format: OutputFormat,
    force: bool,
}

impl DatasetWriter {
    pub fn new<P: Into<PathBuf>>(path: P, format: OutputFormat) -> Self {
        Self {
            path: path.into(),
            format,
            force: false,
        }
    }

    /// Replace an existing destination file instead of refusing
    pub fn force_overwrite(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Fail if the destination exists and overwriting was not requested
    pub fn check_destination(&self) -> Result<(), AppError> {
        if FileManager::file_exists(&self.path) && !self.force {
            return Err(AppError::Output(format!(
                "Output file already exists: {} (use -f/--force-overwrite to replace it)",
                self.path.display()
            )));
        }
        Ok(())
    }

    /// Write every row and return how many were written
    pub fn write(&self, rows: &[DialogueRow]) -> Result<usize, AppError> {
        self.check_destination()?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        FileManager::ensure_dir(&dir).map_err(|e| AppError::Output(format!("{:#}", e)))?;

        let mut temp = NamedTempFile::new_in(&dir).map_err(|e| {
            AppError::Output(format!("Failed to create temporary file in {}: {}", dir.display(), e))
        })?;

        match self.format {
            OutputFormat::Csv => Self::write_csv(temp.as_file_mut(), rows)?,
            OutputFormat::Jsonl => Self::write_jsonl(temp.as_file_mut(), rows)?,
        }
        debug!("Wrote {} rows to {}", rows.len(), temp.path().display());

        temp.persist(&self.path).map_err(|e| {
            AppError::Output(format!("Failed to move dataset to {}: {}", self.path.display(), e.error))
        })?;

        info!("Saved {} rows as {} to {}", rows.len(), self.format, self.path.display());
        Ok(rows.len())
    }

    fn write_csv<W: Write>(out: W, rows: &[DialogueRow]) -> Result<(), AppError> {
        // Header written by hand so an empty dataset still gets one
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
        writer.write_record(COLUMNS)?;

        for row in rows {
            writer.serialize(DatasetRecord::from(row))?;
        }

        writer.flush()?;
        Ok(())
    }

    fn write_jsonl<W: Write>(out: W, rows: &[DialogueRow]) -> Result<(), AppError> {
        let mut writer = BufWriter::new(out);

        for row in rows {
            serde_json::to_writer(&mut writer, &DatasetRecord::from(row))
                .map_err(|e| AppError::Output(format!("Failed to serialize row: {}", e)))?;
            writer.write_all(b"\n")?;
        }

        writer.flush()?;
        Ok(())
    }
}
