use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::output::DatasetWriter;
use crate::pipeline::{BatchOutput, BatchReport, Dataset, FileStatus, PipelineOrchestrator};

// @module: Application controller for dataset extraction

/// Number of speakers listed in the end-of-run summary
const TOP_SPEAKERS: usize = 5;

/// Main application controller: input resolution, batch run, dataset output
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Per-file pipeline built from the configuration
    orchestrator: PipelineOrchestrator,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let orchestrator = PipelineOrchestrator::new(&config);
        Ok(Self { config, orchestrator })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Extract every subtitle file under `input` and write the dataset to
    /// `output`. Files that fail are listed in the returned report; only
    /// batch-level problems are errors.
    pub fn run(&self, input: &Path, output: &Path, force_overwrite: bool) -> Result<BatchReport> {
        let start_time = Instant::now();

        let writer = DatasetWriter::new(output, self.config.output.format).force_overwrite(force_overwrite);
        writer.check_destination()?;

        let files = FileManager::collect_inputs(input, &self.config.input.extension, self.config.input.recursive)?;
        if files.is_empty() {
            return Err(anyhow!(
                "No .{} files found in {}",
                self.config.input.extension,
                input.display()
            ));
        }
        info!("Found {} subtitle file(s) in {}", files.len(), input.display());

        let BatchOutput { dataset, report } = self.extract_with_progress(&files);

        writer
            .write(dataset.rows())
            .with_context(|| format!("Failed to write dataset to {}", output.display()))?;

        self.log_summary(&dataset, &report, start_time);
        Ok(report)
    }

    /// Run the orchestrator over `files` with a progress bar
    fn extract_with_progress(&self, files: &[PathBuf]) -> BatchOutput {
        let progress_bar = ProgressBar::new(files.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("=>-"));
        progress_bar.set_message("Extracting dialogue");

        let output = self.orchestrator.run_with_observer(files, |outcome| {
            let name = FileManager::file_name(&outcome.path).unwrap_or_default();
            progress_bar.set_message(name);
            progress_bar.inc(1);
        });

        progress_bar.finish_and_clear();
        output
    }

    fn log_summary(&self, dataset: &Dataset, report: &BatchReport, start_time: Instant) {
        let elapsed = start_time.elapsed();

        for (path, error) in report.failures() {
            warn!("Skipped {}: {}", path.display(), error);
        }

        let encodings: BTreeSet<&str> = report
            .outcomes
            .iter()
            .filter_map(|o| match &o.status {
                FileStatus::Processed { encoding, .. } => Some(*encoding),
                FileStatus::Skipped(_) => None,
            })
            .collect();

        info!(
            "Processed {} of {} file(s) in {:.2}s: {} rows, {} rejected blocks, {} warnings",
            report.processed_count(),
            report.outcomes.len(),
            elapsed.as_secs_f64(),
            dataset.len(),
            report.rejected_blocks(),
            report.warnings.len()
        );
        if !encodings.is_empty() {
            info!("Encodings: {}", encodings.into_iter().collect::<Vec<_>>().join(", "));
        }
        info!(
            "Off-screen rows: {}, attributed rows: {}, distinct speakers: {}",
            dataset.offscreen_count(),
            dataset.attributed_count(),
            dataset.distinct_speakers()
        );

        let top: Vec<String> = dataset
            .speaker_counts()
            .into_iter()
            .take(TOP_SPEAKERS)
            .map(|(name, count)| format!("{} ({})", name, count))
            .collect();
        if !top.is_empty() {
            info!("Top speakers: {}", top.join(", "));
        }

        if report.has_failures() {
            warn!("{} file(s) were skipped", report.skipped_count());
        }
    }
}
