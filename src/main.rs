// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};

use subtitle_dialogue::app_config::{self, Config, OutputFormat};
use subtitle_dialogue::app_controller::Controller;

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOutputFormat {
    Csv,
    Jsonl,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Csv => OutputFormat::Csv,
            CliOutputFormat::Jsonl => OutputFormat::Jsonl,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract a dialogue dataset from subtitle files (default command)
    Extract(ExtractArgs),

    /// Generate shell completions for subtitle-dialogue
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ExtractArgs {
    /// Subtitle file or directory of subtitle files
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    #[command(flatten)]
    options: ExtractOptions,
}

#[derive(clap::Args, Debug, Clone)]
struct ExtractOptions {
    /// Dataset file to write (overrides output.path)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Dataset format (overrides output.format)
    #[arg(long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Only accept filenames starting with this series title
    #[arg(long)]
    series_title: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Replace an existing dataset file
    #[arg(short, long)]
    force_overwrite: bool,
}

/// Subtitle Dialogue - dialogue datasets from SRT subtitles
///
/// Reads episode subtitle files, splits captions into per-speaker dialogue
/// rows and writes them as one CSV or JSON Lines dataset.
#[derive(Parser, Debug)]
#[command(name = "subtitle-dialogue")]
#[command(version)]
#[command(about = "Extract per-speaker dialogue rows from SRT subtitle files")]
#[command(long_about = "Reads '<Series> - <S>x<E> - <Episode Name>.<suffix>.srt' files, splits
multi-speaker captions, flags off-screen lines, attributes speakers and writes
a single dataset.

EXAMPLES:
    subtitle-dialogue subs/                          # Write subtitle_data.csv
    subtitle-dialogue -f -o data.csv subs/           # Replace an existing dataset
    subtitle-dialogue --format jsonl subs/           # Write JSON Lines instead
    subtitle-dialogue --series-title Westworld subs/ # Only accept that series
    subtitle-dialogue completions bash > sd.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Subtitle file or directory of subtitle files
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    #[command(flatten)]
    options: ExtractOptions,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The logger itself lets everything through; the global max level filters
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn colour_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let colour = Self::colour_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                colour,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subtitle-dialogue", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Extract(args)) => run_extract(&args.input_path, args.options),
        None => {
            // Default behavior - top-level args act as the extract command
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;
            run_extract(&input_path, cli.options)
        }
    }
}

fn run_extract(input_path: &Path, options: ExtractOptions) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = load_or_create_config(&options.config_path)?;
    apply_overrides(&mut config, &options);

    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let output = config.output.path.clone();
    let controller = Controller::with_config(config)?;
    let report = controller.run(input_path, &output, options.force_overwrite)?;

    if report.processed_count() == 0 {
        warn!("No file produced any rows; the dataset is empty");
    }
    info!("Dataset written to {}", output.display());

    Ok(())
}

/// Load the configuration, writing a default one when the file is missing
fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        return Config::load(config_path);
    }

    warn!("Config file not found at '{}', creating default config.", config_path);
    let config = Config::default();
    config
        .save(config_path)
        .with_context(|| format!("Failed to write default config to file: {}", config_path))?;
    Ok(config)
}

/// Command line flags take precedence over the configuration file
fn apply_overrides(config: &mut Config, options: &ExtractOptions) {
    if let Some(output) = &options.output {
        config.output.path = output.clone();
    }

    if let Some(format) = &options.format {
        config.output.format = format.clone().into();
    }

    if let Some(title) = &options.series_title {
        config.episode.series_title = Some(title.clone());
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}
