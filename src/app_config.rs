use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::encoding::DEFAULT_SAMPLE_SIZE;
use crate::dialogue::speakers::DEFAULT_MAX_SPEAKER_TOKENS;
use crate::errors::ConfigError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Which files to pick up from an input directory
    #[serde(default)]
    pub input: InputConfig,

    /// Encoding detection settings
    #[serde(default)]
    pub encoding: EncodingConfig,

    /// Episode filename convention
    #[serde(default)]
    pub episode: EpisodeConfig,

    /// Dialogue extraction settings
    #[serde(default)]
    pub dialogue: DialogueConfig,

    /// Dataset output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Input file selection
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InputConfig {
    // @field: File extension of subtitle files, without the dot
    #[serde(default = "default_extension")]
    pub extension: String,

    // @field: Descend into subdirectories
    #[serde(default = "default_true")]
    pub recursive: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            recursive: true,
        }
    }
}

/// Encoding detection settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EncodingConfig {
    /// Number of leading bytes inspected when guessing the encoding
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// Guesses below this confidence are reported as ambiguous.
    /// Decoding still goes ahead with the guess.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            sample_size: default_sample_size(),
            min_confidence: default_min_confidence(),
        }
    }
}

/// Episode filename convention
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct EpisodeConfig {
    /// Literal series title the filenames must start with.
    /// When unset, any single-segment title (no " - ") is accepted.
    #[serde(default)]
    pub series_title: Option<String>,
}

/// Dialogue extraction settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DialogueConfig {
    /// Captions containing this marker are credits or watermarks, not dialogue
    #[serde(default = "default_styling_marker")]
    pub styling_marker: String,

    /// Captions containing this marker are spoken off-screen
    #[serde(default = "default_italic_marker")]
    pub italic_marker: String,

    /// Separator between two speakers inside one caption
    #[serde(default = "default_speaker_delimiter")]
    pub speaker_delimiter: String,

    /// Longest accepted speaker label, in words
    #[serde(default = "default_max_speaker_tokens")]
    pub max_speaker_tokens: usize,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            styling_marker: default_styling_marker(),
            italic_marker: default_italic_marker(),
            speaker_delimiter: default_speaker_delimiter(),
            max_speaker_tokens: default_max_speaker_tokens(),
        }
    }
}

/// Dataset file format
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    /// One JSON object per line
    Jsonl,
}

impl OutputFormat {
    // @returns: Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Jsonl => "jsonl",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "jsonl" | "json" => Ok(Self::Jsonl),
            _ => Err(anyhow!("Invalid output format: {}", s)),
        }
    }
}

/// Dataset output settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Destination file
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// File format
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            format: OutputFormat::default(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_extension() -> String {
    "srt".to_string()
}

fn default_true() -> bool {
    true
}

fn default_sample_size() -> usize {
    DEFAULT_SAMPLE_SIZE
}

fn default_min_confidence() -> f32 {
    0.5
}

fn default_styling_marker() -> String {
    "<font".to_string()
}

fn default_italic_marker() -> String {
    "<i>".to_string()
}

fn default_speaker_delimiter() -> String {
    "- ".to_string()
}

fn default_max_speaker_tokens() -> usize {
    DEFAULT_MAX_SPEAKER_TOKENS
}

fn default_output_path() -> PathBuf {
    PathBuf::from("subtitle_data.csv")
}

impl Config {
    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Write this configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.input.extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::EmptyValue { field: "input.extension" });
        }

        if self.encoding.sample_size == 0 {
            return Err(ConfigError::OutOfRange {
                field: "encoding.sample_size",
                message: "must be at least 1 byte".to_string(),
            });
        }

        if !(0.0..=1.0).contains(&self.encoding.min_confidence) {
            return Err(ConfigError::OutOfRange {
                field: "encoding.min_confidence",
                message: format!("{} is not within 0.0..=1.0", self.encoding.min_confidence),
            });
        }

        let markers = [
            ("dialogue.styling_marker", &self.dialogue.styling_marker),
            ("dialogue.italic_marker", &self.dialogue.italic_marker),
            ("dialogue.speaker_delimiter", &self.dialogue.speaker_delimiter),
        ];
        for (field, value) in markers {
            if value.is_empty() {
                return Err(ConfigError::EmptyValue { field });
            }
        }

        if self.dialogue.max_speaker_tokens == 0 {
            return Err(ConfigError::OutOfRange {
                field: "dialogue.max_speaker_tokens",
                message: "must be at least 1".to_string(),
            });
        }

        if self.output.path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyValue { field: "output.path" });
        }

        Ok(())
    }
}
