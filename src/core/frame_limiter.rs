use std::time::{Duration, Instant};

/// Caps a loop at a fixed number of iterations per second. The caller owns the
/// clock: every method takes `now` explicitly.
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    period: Duration,
    deadline: Instant,
}

impl FrameLimiter {
    pub fn new(rate_hz: u32, now: Instant) -> FrameLimiter {
        assert!(rate_hz > 0);
        FrameLimiter {
            period: Duration::from_secs_f64(1.0 / rate_hz as f64),
            deadline: now,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time at which the next frame may run.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    /// Marks a frame as done. If the loop fell more than a period behind, the
    /// schedule is re-anchored at `now` instead of running a burst of frames.
    pub fn advance(&mut self, now: Instant) {
        self.deadline += self.period;
        if self.deadline < now {
            self.deadline = now + self.period;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_due_immediately() {
        let start = Instant::now();
        let limiter = FrameLimiter::new(60, start);
        assert!(limiter.is_due(start));
    }

    #[test]
    fn test_frames_are_spaced_by_the_period() {
        let start = Instant::now();
        let mut limiter = FrameLimiter::new(50, start);
        assert_eq!(limiter.period(), Duration::from_millis(20));
        limiter.advance(start);
        assert!(!limiter.is_due(start + Duration::from_millis(19)));
        assert!(limiter.is_due(start + Duration::from_millis(20)));
        assert_eq!(limiter.deadline(), start + Duration::from_millis(20));
    }

    #[test]
    fn test_late_frames_do_not_cause_a_burst() {
        let start = Instant::now();
        let mut limiter = FrameLimiter::new(50, start);
        let late = start + Duration::from_millis(500);
        limiter.advance(late);
        assert_eq!(limiter.deadline(), late + Duration::from_millis(20));
        assert!(!limiter.is_due(late));
    }
}
