use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

/// Fires a callback immediately on start and then once per period.
///
/// The period is measured from start, not from the end of whatever the
/// callback kicks off, so manual refreshes never shift it.
pub struct RefreshScheduler {
    period: Duration,
    ticker: Option<JoinHandle<()>>,
}

/// Shortest period the ticker accepts; `tokio::time::interval` rejects zero.
const MIN_PERIOD: Duration = Duration::from_secs(1);

impl RefreshScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(MIN_PERIOD),
            ticker: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn state(&self) -> SchedulerState {
        match &self.ticker {
            Some(handle) if !handle.is_finished() => SchedulerState::Running,
            _ => SchedulerState::Stopped,
        }
    }

    /// Must be called from within a tokio runtime. Starting a running
    /// scheduler is a no-op.
    pub fn start<F>(&mut self, on_fire: F)
    where
        F: Fn() + Send + 'static,
    {
        if self.state() == SchedulerState::Running {
            return;
        }

        let period = self.period;
        info!("Starting refresh scheduler (every {}s)", period.as_secs());
        self.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                // First tick completes immediately
                interval.tick().await;
                on_fire();
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
            info!("Refresh scheduler stopped");
        }
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}
