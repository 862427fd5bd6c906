use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::engine::{CountdownBreakdown, countdown};

/// Shortest period a ticker runs at. A zero period is raised to this.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Live countdown to one deadline.
/// Resamples the clock on a fixed interval and publishes the breakdown.
pub struct CountdownTicker {
    clock: Arc<dyn Clock>,
    deadline: DateTime<Utc>,
    interval: Duration,
}

impl CountdownTicker {
    /// `interval` is raised to at least one millisecond.
    pub fn new(clock: Arc<dyn Clock>, deadline: DateTime<Utc>, interval: Duration) -> Self {
        Self {
            clock,
            deadline,
            interval: interval.max(MIN_INTERVAL),
        }
    }

    /// Ticks once per second.
    pub fn every_second(clock: Arc<dyn Clock>, deadline: DateTime<Utc>) -> Self {
        Self::new(clock, deadline, Duration::from_secs(1))
    }

    /// Start ticking in the background.
    ///
    /// The task ends on its own once the deadline has passed or every
    /// receiver is gone. Dropping the returned handle aborts it.
    pub fn spawn(self) -> TickerHandle {
        let initial = countdown(self.deadline, self.clock.now());
        let (tx, rx) = watch::channel(initial);

        let task = tokio::spawn(async move {
            self.run(tx).await;
        });

        TickerHandle { rx, task }
    }

    async fn run(self, tx: watch::Sender<CountdownBreakdown>) {
        info!(
            "Starting countdown ticker (deadline: {}, interval: {:?})",
            self.deadline, self.interval
        );

        let mut interval = tokio::time::interval(self.interval);
        // interval fires immediately; the initial value is already published
        interval.tick().await;

        loop {
            interval.tick().await;

            let now = self.clock.now();
            if tx.send(countdown(self.deadline, now)).is_err() {
                debug!("countdown ticker has no receivers left, stopping");
                break;
            }
            // the breakdown hits zero up to a second early, so stop on the instant
            if now >= self.deadline {
                debug!("deadline {} reached, stopping ticker", self.deadline);
                break;
            }
        }
    }
}

/// Owner of a running [`CountdownTicker`].
pub struct TickerHandle {
    rx: watch::Receiver<CountdownBreakdown>,
    task: JoinHandle<()>,
}

impl TickerHandle {
    /// Most recently published breakdown.
    pub fn current(&self) -> CountdownBreakdown {
        *self.rx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<CountdownBreakdown> {
        self.rx.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
