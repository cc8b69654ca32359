use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_RATE_LIMIT_REQUESTS, DEFAULT_RATE_LIMIT_WINDOW_SECS};

/// Limits applied to model calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Calls allowed inside one window
    pub max_calls: u32,
    /// Fixed window length
    pub window: Duration,
}

impl RateLimitPolicy {
    pub fn new(max_calls: u32, window: Duration) -> Self {
        Self { max_calls, window }
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_RATE_LIMIT_REQUESTS,
            Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
        )
    }
}

/// Outcome of asking the window for a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The call was counted and may proceed
    Admitted,
    /// The window is full; retry after this much time
    Wait(Duration),
}

/// Fixed-window call counter
///
/// The counter is never decremented; it only goes back to zero when the
/// whole window is reset. Bursts right after a reset are allowed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateWindow {
    /// When the current window opened
    pub window_start: DateTime<Utc>,
    /// Calls admitted since `window_start`
    pub calls_in_window: u32,
}

impl RateWindow {
    /// Create a new window opening at `now`
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            window_start: now,
            calls_in_window: 0,
        }
    }

    /// Start a fresh window at `now`
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.window_start = now;
        self.calls_in_window = 0;
    }

    /// Count one call against the window
    pub fn record_call(&mut self) {
        self.calls_in_window += 1;
    }

    /// Time left in the current window, zero once it has elapsed
    pub fn remaining(&self, now: DateTime<Utc>, policy: &RateLimitPolicy) -> Duration {
        let elapsed = (now - self.window_start)
            .to_std()
            .unwrap_or(Duration::ZERO);
        policy.window.saturating_sub(elapsed)
    }

    /// Check whether a call fits in the window, and count it if it does
    ///
    /// An elapsed window is rolled over before the check.
    pub fn check_and_increment(
        &mut self,
        now: DateTime<Utc>,
        policy: &RateLimitPolicy,
    ) -> Admission {
        let window = TimeDelta::from_std(policy.window).unwrap_or(TimeDelta::MAX);
        if now - self.window_start >= window {
            self.reset(now);
        }

        if self.calls_in_window >= policy.max_calls {
            tracing::warn!(
                "Model call limit reached: {}/{}",
                self.calls_in_window,
                policy.max_calls
            );
            return Admission::Wait(self.remaining(now, policy));
        }

        self.record_call();
        Admission::Admitted
    }
}
