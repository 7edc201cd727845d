//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument
//! parsing and configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_MIN_NAME_SIMILARITY, DEFAULT_MIN_OVERLAP_RATIO, WORKER_LIMIT,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to
/// most verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Table export format.
#[derive(Clone, Debug, ValueEnum)]
pub enum ExportFormat {
    /// One CSV file per canonical table.
    Csv,
    /// One JSON-lines file per canonical table.
    Jsonl,
}

/// Application configuration.
///
/// Can be parsed from the command line (clap derive) or constructed
/// programmatically via `Default` and struct update syntax.
///
/// # Examples
///
/// ```no_run
/// use fabric_status::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     manifest: PathBuf::from("bundle.txt"),
///     max_workers: 4,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fabric_status",
    about = "Reconstructs SAN fabric topology from Fibre Channel switch diagnostic dumps"
)]
pub struct Config {
    /// Bundle manifest file: one `fabric_name,fabric_label,path[,switch_index]`
    /// line per switch dump
    pub manifest: PathBuf,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,

    /// Maximum concurrent per-switch parse tasks
    #[arg(long, default_value_t = WORKER_LIMIT)]
    pub max_workers: usize,

    /// OUI-to-device-class table (CSV); the built-in table is used when omitted
    #[arg(long)]
    pub oui_table: Option<PathBuf>,

    /// Enclosure/blade inventory (CSV) for SRV_BLADE / SRV_SYNERGY resolution
    #[arg(long)]
    pub enclosure_inventory: Option<PathBuf>,

    /// Minimum shared-device ratio for device-overlap pairing
    #[arg(long, default_value_t = DEFAULT_MIN_OVERLAP_RATIO)]
    pub min_overlap_ratio: f64,

    /// Minimum normalized similarity score for name-based pairing
    #[arg(long, default_value_t = DEFAULT_MIN_NAME_SIMILARITY)]
    pub min_name_similarity: f64,

    /// Directory to write canonical table exports into (no export when omitted)
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Export format for canonical tables
    #[arg(long, value_enum, default_value = "csv")]
    pub export_format: ExportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("bundle.txt"),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            max_workers: WORKER_LIMIT,
            oui_table: None,
            enclosure_inventory: None,
            min_overlap_ratio: DEFAULT_MIN_OVERLAP_RATIO,
            min_name_similarity: DEFAULT_MIN_NAME_SIMILARITY,
            export_dir: None,
            export_format: ExportFormat::Csv,
        }
    }
}
