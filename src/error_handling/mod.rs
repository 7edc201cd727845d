//! Error handling and processing statistics.
//!
//! This module provides:
//! - Typed initialization/configuration errors (the only fatal errors)
//! - Error/warning/info categorization enums
//! - Thread-safe per-run statistics counters

mod stats;
mod types;

pub use stats::{print_processing_statistics, ProcessingStats};
pub use types::{ErrorType, InfoType, InitializationError, WarningType};
