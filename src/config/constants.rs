//! Configuration constants.
//!
//! This module defines all configuration constants used throughout the
//! application, including concurrency limits, timeouts, and the tuned
//! pairing thresholds.

use std::time::Duration;

/// Maximum concurrent per-switch parse tasks (semaphore limit).
pub const WORKER_LIMIT: usize = 8;

/// Interval between progress log lines, in seconds.
pub const LOGGING_INTERVAL: u64 = 5;

/// Per-switch parse timeout.
///
/// Applied only at the parse task boundary: once aggregation for a fabric
/// starts there is no cancellation mid-fabric, because a partially
/// aggregated fabric is not a valid state.
pub const PARSE_TIMEOUT: Duration = Duration::from_secs(120);

/// Minimum ratio of shared device names for device-overlap pairing.
///
/// Tuned against real customer datasets; change deliberately, not casually.
pub const DEFAULT_MIN_OVERLAP_RATIO: f64 = 0.5;

/// Minimum normalized name-similarity score for name-based pairing.
///
/// Tuned against real customer datasets; change deliberately, not casually.
pub const DEFAULT_MIN_NAME_SIMILARITY: f64 = 0.8;

/// Maximum length of a symbolic descriptor string we attempt to decode.
/// Longer strings are truncated first; vendor firmware occasionally pads
/// the field with kilobytes of garbage.
pub const MAX_DESCRIPTOR_LENGTH: usize = 512;
