use std::sync::Arc;
use std::time::Duration;

use crate::clock::Clock;
use crate::models::{Admission, RateLimitPolicy, RateWindow};

/// Blocking fixed-window gate in front of the model collaborator
///
/// Meant for a single caller: it holds no lock and `acquire` takes
/// `&mut self`.
pub struct RateLimiter {
    window: RateWindow,
    policy: RateLimitPolicy,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(policy: RateLimitPolicy, clock: Arc<dyn Clock>) -> Self {
        let window = RateWindow::new(clock.now());
        Self {
            window,
            policy,
            clock,
        }
    }

    /// Take one call slot, sleeping out the window if it is full
    ///
    /// Returns how long the caller was blocked. After a wait the window is
    /// reset and the waiting call is counted as the first call of the new
    /// window.
    pub fn acquire(&mut self) -> Duration {
        match self.window.check_and_increment(self.clock.now(), &self.policy) {
            Admission::Admitted => Duration::ZERO,
            Admission::Wait(remaining) => {
                tracing::warn!(
                    "Rate limit of {} calls per {:?} reached, waiting {:?}",
                    self.policy.max_calls,
                    self.policy.window,
                    remaining
                );
                self.clock.sleep(remaining);
                self.window.reset(self.clock.now());
                self.window.record_call();
                remaining
            }
        }
    }

    pub fn window(&self) -> &RateWindow {
        &self.window
    }

    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }
}
