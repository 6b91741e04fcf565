use foundation::time::Time;

/// Leading-edge throttle: the first call runs, then at most one call per
/// `interval_ms`.
///
/// Each recompute concern owns its own throttle so intervals can be tuned
/// independently instead of sharing one magic number.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Throttle {
    interval_ms: f64,
    last_run: Option<Time>,
}

impl Throttle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            last_run: None,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Returns `true` (and records `now`) if the throttle lets this call through.
    pub fn ready(&mut self, now: Time) -> bool {
        let due = match self.last_run {
            None => true,
            Some(last) => now.since(last) >= self.interval_ms,
        };
        if due {
            self.last_run = Some(now);
        }
        due
    }

    /// Makes the next `ready` call pass regardless of timing.
    pub fn reset(&mut self) {
        self.last_run = None;
    }
}
