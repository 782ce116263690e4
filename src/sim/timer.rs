//! Monotonic rate limiter for simulation steps.

use std::time::{Duration, Instant};

/// Decides whether a simulation step is due this frame, independently of the
/// presentation frame rate.
///
/// The query and the reset are deliberately separate operations: a caller may
/// check readiness, decide not to act because resources are unavailable, and
/// check again later without losing the pending step.
pub struct UpdateTimer {
    interval: Duration,
    last_update: Instant,
}

impl UpdateTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_update: Instant::now(),
        }
    }

    /// True iff more than `interval` has elapsed since the last scheduled
    /// step. A zero interval means every frame is due.
    pub fn is_due(&self) -> bool {
        self.interval.is_zero() || self.last_update.elapsed() > self.interval
    }

    /// Marks a step as scheduled now.
    pub fn notify_scheduled(&mut self) {
        self.last_update = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_due_right_after_scheduling() {
        let mut timer = UpdateTimer::new(Duration::from_secs(60));
        timer.notify_scheduled();
        assert!(!timer.is_due());
    }

    #[test]
    fn due_after_the_interval_elapses() {
        let timer = UpdateTimer::new(Duration::from_millis(5));
        std::thread::sleep(Duration::from_millis(15));
        assert!(timer.is_due());
    }

    #[test]
    fn zero_interval_is_always_due() {
        let timer = UpdateTimer::new(Duration::ZERO);
        assert!(timer.is_due());
        assert!(timer.is_due());
    }

    #[test]
    fn query_has_no_side_effect() {
        let timer = UpdateTimer::new(Duration::from_secs(60));
        assert_eq!(timer.is_due(), timer.is_due());
    }
}
