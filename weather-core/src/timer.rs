//! A polled repeating timer with an owned cancellation token.
//!
//! The timer never runs on its own thread. Whoever owns it checks
//! [`RepeatingTimer::is_due`] from the event loop and calls
//! [`RepeatingTimer::reschedule`] after handling a fire. Once cancelled, it is
//! never due again.

use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub struct RepeatingTimer {
    due: Instant,
    token: CancellationToken,
}

/// Read-only view of a timer's cancellation state. Outlives the timer.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    token: CancellationToken,
}

impl RepeatingTimer {
    pub fn new(now: Instant, delay: Duration) -> Self {
        Self { due: now + delay, token: CancellationToken::new() }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        !self.token.is_cancelled() && now >= self.due
    }

    pub fn reschedule(&mut self, now: Instant, delay: Duration) {
        self.due = now + delay;
    }

    /// Time left before the next fire, `None` once cancelled.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        if self.token.is_cancelled() {
            return None;
        }
        Some(self.due.saturating_duration_since(now))
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn handle(&self) -> TimerHandle {
        TimerHandle { token: self.token.clone() }
    }
}

impl Drop for RepeatingTimer {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

impl TimerHandle {
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
