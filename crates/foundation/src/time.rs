/// Time primitives.
///
/// Browser timestamps (`performance.now()`, animation-frame callbacks) are
/// milliseconds since page load, so that is the unit used everywhere.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Time(pub f64); // milliseconds

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn from_millis(ms: f64) -> Self {
        Time(ms)
    }

    pub fn millis(self) -> f64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier`, clamped at zero so a clock that
    /// steps backwards never yields a negative interval.
    pub fn since(self, earlier: Time) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}

impl std::ops::Add<f64> for Time {
    type Output = Time;

    fn add(self, ms: f64) -> Time {
        Time(self.0 + ms)
    }
}

#[cfg(test)]
mod tests {
    use super::Time;

    #[test]
    fn since_is_clamped() {
        assert_eq!(Time(150.0).since(Time(100.0)), 50.0);
        assert_eq!(Time(100.0).since(Time(150.0)), 0.0);
    }

    #[test]
    fn add_offsets_millis() {
        assert_eq!(Time::ZERO + 16.0, Time(16.0));
    }
}
