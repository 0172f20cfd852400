/*!
 * Batch pipeline: runs the per-file stages over many files and collects the
 * rows and a per-file report.
 */

pub mod dataset;
pub mod orchestrator;
pub mod report;

pub use dataset::Dataset;
pub use orchestrator::{BatchOutput, FileResult, PipelineOrchestrator};
pub use report::{BatchReport, FileOutcome, FileStatus, PipelineWarning};
