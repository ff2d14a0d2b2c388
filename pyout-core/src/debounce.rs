use std::time::{Duration, Instant};

/// Quiet period between the last trigger event and an evaluation
pub const EVAL_DEBOUNCE: Duration = Duration::from_millis(500);

/// Collapses bursts of trigger events into a single deadline.
///
/// Poll-driven: `schedule` replaces any pending deadline, and `fire` reports
/// at most once per schedule that the quiet period has elapsed. There is no
/// queue; only the most recent schedule survives.
#[derive(Debug)]
pub struct Debouncer {
    deadline: Option<Instant>,
    quiet: Duration,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            deadline: None,
            quiet,
        }
    }

    /// Arrange a callback for one quiet period from `now`, cancelling any
    /// pending one
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True once the quiet period has elapsed; clears the deadline
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(EVAL_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(500);

    #[test]
    fn test_fires_once_after_quiet_period() {
        let mut debouncer = Debouncer::new(QUIET);
        let t0 = Instant::now();

        debouncer.schedule(t0);
        assert!(!debouncer.fire(t0));
        assert!(!debouncer.fire(t0 + Duration::from_millis(499)));
        assert!(debouncer.fire(t0 + Duration::from_millis(500)));
        // Already fired; nothing pending
        assert!(!debouncer.fire(t0 + Duration::from_secs(10)));
    }

    #[test]
    fn test_burst_coalesces_to_one_firing() {
        let mut debouncer = Debouncer::new(QUIET);
        let t0 = Instant::now();

        debouncer.schedule(t0);
        debouncer.schedule(t0 + Duration::from_millis(100));
        debouncer.schedule(t0 + Duration::from_millis(200));

        // Only the last schedule counts
        assert!(!debouncer.fire(t0 + Duration::from_millis(600)));
        assert!(debouncer.fire(t0 + Duration::from_millis(700)));
        assert!(!debouncer.fire(t0 + Duration::from_millis(800)));
    }

    #[test]
    fn test_cancel_drops_pending_deadline() {
        let mut debouncer = Debouncer::new(QUIET);
        let t0 = Instant::now();

        debouncer.schedule(t0);
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert!(!debouncer.fire(t0 + Duration::from_secs(1)));
    }

    #[test]
    fn test_never_fires_without_schedule() {
        let mut debouncer = Debouncer::default();
        assert!(!debouncer.fire(Instant::now() + Duration::from_secs(60)));
    }
}
