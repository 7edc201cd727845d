//! Processing statistics tracking.
//!
//! This module provides thread-safe statistics tracking for errors, warnings,
//! and informational metrics during dump processing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::{ErrorType, InfoType, WarningType};

/// Thread-safe processing statistics tracker.
///
/// Tracks errors, warnings, and informational metrics using atomic counters,
/// allowing concurrent access from multiple parse tasks. All types are
/// initialized to zero on creation.
///
/// # Categories
///
/// - **Errors**: Failures that kept a switch out of the fabric model
/// - **Warnings**: Degraded or missing data
/// - **Info**: Notable events that aren't errors or warnings
///
/// # Thread Safety
///
/// This struct is thread-safe and can be shared across multiple tasks using `Arc`.
pub struct ProcessingStats {
    errors: HashMap<ErrorType, AtomicUsize>,
    warnings: HashMap<WarningType, AtomicUsize>,
    info: HashMap<InfoType, AtomicUsize>,
}

impl ProcessingStats {
    /// Creates a tracker with every counter initialized to zero.
    pub fn new() -> Self {
        let mut errors = HashMap::new();
        for error in ErrorType::iter() {
            errors.insert(error, AtomicUsize::new(0));
        }

        let mut warnings = HashMap::new();
        for warning in WarningType::iter() {
            warnings.insert(warning, AtomicUsize::new(0));
        }

        let mut info = HashMap::new();
        for info_type in InfoType::iter() {
            info.insert(info_type, AtomicUsize::new(0));
        }

        ProcessingStats {
            errors,
            warnings,
            info,
        }
    }

    /// Increment an error counter.
    pub fn increment_error(&self, error: ErrorType) {
        if let Some(counter) = self.errors.get(&error) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment error counter for {:?} which is not in the map. \
                 This indicates a bug in ProcessingStats initialization.",
                error
            );
        }
    }

    /// Increment a warning counter.
    pub fn increment_warning(&self, warning: WarningType) {
        if let Some(counter) = self.warnings.get(&warning) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment warning counter for {:?} which is not in the map. \
                 This indicates a bug in ProcessingStats initialization.",
                warning
            );
        }
    }

    /// Increment an info counter.
    pub fn increment_info(&self, info_type: InfoType) {
        if let Some(counter) = self.info.get(&info_type) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment info counter for {:?} which is not in the map. \
                 This indicates a bug in ProcessingStats initialization.",
                info_type
            );
        }
    }

    /// Increment a warning counter `n` times at once.
    pub fn add_warnings(&self, warning: WarningType, n: usize) {
        if n == 0 {
            return;
        }
        if let Some(counter) = self.warnings.get(&warning) {
            counter.fetch_add(n, Ordering::Relaxed);
        }
    }

    /// Get the count for an error type.
    pub fn get_error_count(&self, error: ErrorType) -> usize {
        self.errors
            .get(&error)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Get the count for a warning type.
    pub fn get_warning_count(&self, warning: WarningType) -> usize {
        self.warnings
            .get(&warning)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Get the count for an info type.
    pub fn get_info_count(&self, info_type: InfoType) -> usize {
        self.info
            .get(&info_type)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Get total error count across all error types.
    pub fn total_errors(&self) -> usize {
        ErrorType::iter().map(|e| self.get_error_count(e)).sum()
    }

    /// Get total warning count across all warning types.
    pub fn total_warnings(&self) -> usize {
        WarningType::iter().map(|w| self.get_warning_count(w)).sum()
    }

    /// Get total info count across all info types.
    pub fn total_info(&self) -> usize {
        InfoType::iter().map(|i| self.get_info_count(i)).sum()
    }
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints per-type processing statistics at the end of a run.
pub fn print_processing_statistics(stats: &ProcessingStats) {
    if stats.total_errors() > 0 {
        log::info!("Errors by type:");
        for error in ErrorType::iter() {
            let count = stats.get_error_count(error);
            if count > 0 {
                log::info!("  {}: {}", error.as_str(), count);
            }
        }
    }
    if stats.total_warnings() > 0 {
        log::info!("Warnings by type:");
        for warning in WarningType::iter() {
            let count = stats.get_warning_count(warning);
            if count > 0 {
                log::info!("  {}: {}", warning.as_str(), count);
            }
        }
    }
    if stats.total_info() > 0 {
        log::info!("Info by type:");
        for info in InfoType::iter() {
            let count = stats.get_info_count(info);
            if count > 0 {
                log::info!("  {}: {}", info.as_str(), count);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let stats = ProcessingStats::new();
        assert_eq!(stats.total_errors(), 0);
        assert_eq!(stats.total_warnings(), 0);
        assert_eq!(stats.total_info(), 0);
    }

    #[test]
    fn test_increment_error() {
        let stats = ProcessingStats::new();
        stats.increment_error(ErrorType::DumpUnreadable);
        stats.increment_error(ErrorType::DumpUnreadable);
        stats.increment_error(ErrorType::ParseTimeout);
        assert_eq!(stats.get_error_count(ErrorType::DumpUnreadable), 2);
        assert_eq!(stats.get_error_count(ErrorType::ParseTimeout), 1);
        assert_eq!(stats.total_errors(), 3);
    }

    #[test]
    fn test_add_warnings_bulk() {
        let stats = ProcessingStats::new();
        stats.add_warnings(WarningType::UndecodedDescriptor, 5);
        stats.add_warnings(WarningType::UndecodedDescriptor, 0);
        assert_eq!(
            stats.get_warning_count(WarningType::UndecodedDescriptor),
            5
        );
    }

    #[test]
    fn test_increment_info() {
        let stats = ProcessingStats::new();
        stats.increment_info(InfoType::IslDeduplicated);
        assert_eq!(stats.get_info_count(InfoType::IslDeduplicated), 1);
        assert_eq!(stats.total_info(), 1);
    }

    #[test]
    fn test_concurrent_increments() {
        use std::sync::Arc;
        let stats = Arc::new(ProcessingStats::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let stats = Arc::clone(&stats);
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    stats.increment_warning(WarningType::UnknownDeviceClass);
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(
            stats.get_warning_count(WarningType::UnknownDeviceClass),
            800
        );
    }
}
