use foundation::time::Time;

/// Animation-frame metadata.
///
/// Built from the timestamps handed to `requestAnimationFrame` callbacks so
/// per-frame logic can be driven (and replayed in tests) without a browser.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Timestamp of this frame.
    pub time: Time,
    /// Milliseconds since the previous frame (0 for the first one).
    pub dt_ms: f64,
}

impl Frame {
    pub fn first(time: Time) -> Self {
        Self {
            index: 0,
            time,
            dt_ms: 0.0,
        }
    }

    pub fn next(self, time: Time) -> Self {
        Self {
            index: self.index + 1,
            time,
            dt_ms: time.since(self.time),
        }
    }
}

/// Tracks the latest frame of a running animation loop.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct FrameClock {
    last: Option<Frame>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, time: Time) -> Frame {
        let frame = match self.last {
            None => Frame::first(time),
            Some(prev) => prev.next(time),
        };
        self.last = Some(frame);
        frame
    }

    pub fn last(&self) -> Option<Frame> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::{Frame, FrameClock};
    use foundation::time::Time;

    #[test]
    fn next_advances_index_and_delta() {
        let f0 = Frame::first(Time(1000.0));
        let f1 = f0.next(Time(1016.0));
        assert_eq!(f1.index, 1);
        assert_eq!(f1.dt_ms, 16.0);
    }

    #[test]
    fn clock_starts_at_zero_delta() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(Time(5.0)).dt_ms, 0.0);
        let f = clock.tick(Time(21.0));
        assert_eq!((f.index, f.dt_ms), (1, 16.0));
        assert_eq!(clock.last(), Some(f));
    }
}
