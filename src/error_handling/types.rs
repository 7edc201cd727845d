//! Error type definitions.
//!
//! This module defines all error, warning, and info types used throughout the application.

use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
///
/// These are the only fatal errors in the pipeline: a misconfiguration that
/// makes the whole run meaningless. Data-quality problems inside a dump are
/// never represented here.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(String),

    /// The bundle manifest could not be read.
    #[error("Manifest error: {0}")]
    ManifestError(String),

    /// An explicitly configured OUI table could not be read or parsed.
    #[error("OUI table error: {0}")]
    OuiTableError(String),

    /// An explicitly configured enclosure inventory could not be read or parsed.
    #[error("Enclosure inventory error: {0}")]
    EnclosureInventoryError(String),
}

/// Types of errors that can occur while processing one switch dump.
///
/// This enum categorizes actual error conditions - failures that prevent a
/// switch from contributing to the fabric model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    /// The dump file could not be opened or read.
    DumpUnreadable,
    /// The dump file was read but produced no usable sections at all.
    DumpUnparseable,
    /// The per-switch parse task exceeded its timeout.
    ParseTimeout,
    /// A manifest line was malformed and skipped.
    ManifestLineInvalid,
}

/// Types of warnings that can occur during dump processing.
///
/// Warnings indicate missing or degraded data that doesn't prevent the run
/// from completing but is worth tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum WarningType {
    /// A mandatory section was absent from a dump.
    MissingMandatorySection,
    /// A name-server row had symbolic strings that matched no recognizer.
    UndecodedDescriptor,
    /// A connected port could only be classified as UNKNOWN.
    UnknownDeviceClass,
    /// A switch could not be paired by any strategy.
    UnpairedSwitch,
}

/// Types of informational metrics tracked during a run.
///
/// Info metrics track notable data points that aren't errors or warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    /// An NPIV fan-in produced extra port rows for one physical port.
    NpivFanIn,
    /// A duplicate ISL report was collapsed into its canonical row.
    IslDeduplicated,
    /// A pairing was resolved by the low-confidence colocation fallback.
    ColocationPairing,
    /// A pairing was resolved by the final repair pass.
    RepairPassPairing,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    /// Returns a human-readable string representation of the error type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::DumpUnreadable => "Dump file unreadable",
            ErrorType::DumpUnparseable => "Dump file unparseable",
            ErrorType::ParseTimeout => "Per-switch parse timeout",
            ErrorType::ManifestLineInvalid => "Invalid manifest line",
        }
    }
}

impl WarningType {
    /// Returns a human-readable string representation of the warning type.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningType::MissingMandatorySection => "Missing mandatory section",
            WarningType::UndecodedDescriptor => "Undecoded symbolic descriptor",
            WarningType::UnknownDeviceClass => "Device classified UNKNOWN",
            WarningType::UnpairedSwitch => "Switch left unpaired",
        }
    }
}

impl InfoType {
    /// Returns a human-readable string representation of the info type.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::NpivFanIn => "NPIV fan-in",
            InfoType::IslDeduplicated => "ISL deduplicated",
            InfoType::ColocationPairing => "Colocation pairing",
            InfoType::RepairPassPairing => "Repair-pass pairing",
        }
    }
}
