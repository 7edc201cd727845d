//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - Logger (with plain and JSON formats)
//! - Concurrency semaphore for the per-switch worker pool
//!
//! The static lookup resources (OUI table, enclosure inventory) are loaded
//! once per run by their owning modules (`classify::oui`,
//! `inputs::enclosure`).

mod logger;

use std::sync::Arc;

use tokio::sync::Semaphore;

// Re-export public API
pub use logger::init_logger_with;

/// Initializes a semaphore for controlling concurrency.
///
/// Creates a new semaphore with the specified permit count. This semaphore
/// is used to limit the number of concurrent per-switch parse tasks.
///
/// # Arguments
///
/// * `count` - Maximum number of concurrent parse tasks allowed
///
/// # Returns
///
/// An `Arc<Semaphore>` that can be shared across multiple tasks.
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_semaphore_permit_count() {
        let semaphore = init_semaphore(4);
        assert_eq!(semaphore.available_permits(), 4);
    }
}
