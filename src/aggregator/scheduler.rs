use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::engine::Aggregator;

const MIN_PERIOD: Duration = Duration::from_millis(10);

/// Periodic refresh task owned by whoever started it.
///
/// Runs a cycle immediately, then once per period. Cycles never overlap: each
/// one waits for the aggregator's write lock. Ticks missed while a slow cycle
/// holds the lock are delivered back to back afterwards rather than dropped.
///
/// Dropping the scheduler stops it.
pub struct Scheduler {
    handle: JoinHandle<()>,
    period: Duration,
}

impl Scheduler {
    /// Spawns the refresh loop on the current tokio runtime.
    ///
    /// Periods shorter than 10ms are raised to 10ms.
    pub fn start(aggregator: Arc<Aggregator>, period: Duration) -> Self {
        let period = if period < MIN_PERIOD {
            tracing::warn!(requested = ?period, used = ?MIN_PERIOD, "Refresh period too short");
            MIN_PERIOD
        } else {
            period
        };

        let handle = tokio::spawn(async move {
            // Default burst behaviour: late ticks fire immediately, none are skipped.
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                tracing::debug!("Starting scheduled refresh");
                if let Err(e) = aggregator.run_cycle().await {
                    tracing::warn!(error = %e, "Scheduled refresh failed");
                }
            }
        });

        tracing::info!(period = ?period, "Auto-refresh started");
        Self { handle, period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stops the loop. A cycle in progress is abandoned at its next await
    /// point; nothing half-built is ever published.
    pub fn stop(self) {
        tracing::info!("Auto-refresh stopped");
        // Drop aborts the task.
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
