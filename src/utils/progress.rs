//! Periodic progress logging for long runs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::info;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::LOGGING_INTERVAL;

/// Shared completed-task counter.
pub type ProgressCounter = Arc<AtomicUsize>;

/// Spawns a task that logs completed/total switch counts every few seconds
/// until cancelled.
pub fn spawn_progress_logger(
    completed: ProgressCounter,
    total: usize,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(LOGGING_INTERVAL));
        interval.tick().await; // first tick fires immediately
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = interval.tick() => {
                    let done = completed.load(Ordering::Relaxed);
                    info!("Processed {}/{} switch dumps", done, total);
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_progress_logger_stops_on_cancel() {
        let completed: ProgressCounter = Arc::new(AtomicUsize::new(0));
        let token = CancellationToken::new();
        let handle = spawn_progress_logger(Arc::clone(&completed), 10, token.clone());
        completed.fetch_add(3, Ordering::Relaxed);
        token.cancel();
        handle.await.unwrap();
    }
}
