//! Cancellable fixed-interval polling.
//!
//! A [`PollTask`] sleeps for its interval, runs a check, and repeats until the
//! check reports completion or one of its limits is hit. All waiting goes
//! through `tokio::time`, so tests drive it with paused time.

use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::debug;

/// Limits for a [`PollTask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Wait before every check, including the first.
    pub interval: Duration,
    /// Stop after this many checks.
    pub max_attempts: Option<u32>,
    /// Stop once this much time has passed since the task started.
    pub timeout: Option<Duration>,
}

impl PollConfig {
    #[must_use]
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// What a check observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick<T> {
    /// Not done yet; poll again.
    Pending,
    /// Terminal; stop with this value.
    Done(T),
}

/// Why a [`PollTask`] stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStop<T> {
    Done(T),
    Cancelled,
    AttemptsExhausted { attempts: u32 },
    TimedOut { elapsed: Duration },
}

/// Stops a running [`PollTask`] from elsewhere.
#[derive(Debug, Clone)]
pub struct PollCanceller {
    tx: watch::Sender<bool>,
}

impl PollCanceller {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// A polling loop over an async check.
#[derive(Debug)]
pub struct PollTask {
    config: PollConfig,
    tx: watch::Sender<bool>,
    cancelled: watch::Receiver<bool>,
}

impl PollTask {
    pub fn new(config: PollConfig) -> Self {
        let (tx, cancelled) = watch::channel(false);
        Self {
            config,
            tx,
            cancelled,
        }
    }

    #[must_use]
    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    #[must_use]
    pub fn canceller(&self) -> PollCanceller {
        PollCanceller {
            tx: self.tx.clone(),
        }
    }

    /// Runs the loop. `check` receives the 1-based attempt number.
    pub async fn run<T, F, Fut>(mut self, mut check: F) -> PollStop<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Tick<T>>,
    {
        let started = Instant::now();
        let mut attempts = 0u32;

        loop {
            if *self.cancelled.borrow_and_update() {
                return PollStop::Cancelled;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.interval) => {}
                _ = self.cancelled.changed() => {
                    debug!("Poll cancelled after {attempts} attempts");
                    return PollStop::Cancelled;
                }
            }

            let elapsed = started.elapsed();
            if self.config.timeout.is_some_and(|timeout| elapsed > timeout) {
                debug!("Poll timed out after {attempts} attempts");
                return PollStop::TimedOut { elapsed };
            }

            attempts += 1;
            if let Tick::Done(value) = check(attempts).await {
                debug!("Poll finished on attempt {attempts}");
                return PollStop::Done(value);
            }

            if self
                .config
                .max_attempts
                .is_some_and(|max| attempts >= max)
            {
                debug!("Poll gave up after {attempts} attempts");
                return PollStop::AttemptsExhausted { attempts };
            }
        }
    }
}
