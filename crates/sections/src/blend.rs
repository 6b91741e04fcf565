use foundation::color::Rgb;

/// Scales weights to sum to 1. `None` when the total is not positive.
pub fn normalize(weights: &[f64]) -> Option<Vec<f64>> {
    let total: f64 = weights.iter().copied().filter(|w| *w > 0.0).sum();
    if total <= 0.0 {
        return None;
    }
    Some(weights.iter().map(|w| w.max(0.0) / total).collect())
}

/// Weighted average of colours; weights are normalised first.
pub fn blend(colors: &[Rgb], weights: &[f64]) -> Option<Rgb> {
    let weights = normalize(weights)?;
    Some(
        colors
            .iter()
            .zip(weights)
            .fold(Rgb::BLACK, |acc, (c, w)| acc + c.scale(w)),
    )
}

/// Exponential easing toward a target colour.
///
/// Every step covers `rate` of the remaining distance. Steps are per frame,
/// not per unit time, so the speed follows the display's frame rate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorEaser {
    current: Rgb,
    target: Rgb,
    rate: f64,
}

impl ColorEaser {
    pub fn new(initial: Rgb, rate: f64) -> Self {
        Self {
            current: initial,
            target: initial,
            rate: rate.clamp(0.0, 1.0),
        }
    }

    pub fn current(&self) -> Rgb {
        self.current
    }

    pub fn target(&self) -> Rgb {
        self.target
    }

    pub fn set_target(&mut self, target: Rgb) {
        self.target = target;
    }

    pub fn step(&mut self) -> Rgb {
        self.current = self.current.lerp(self.target, self.rate);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::{ColorEaser, blend, normalize};
    use foundation::color::Rgb;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalize_sums_to_one() {
        assert_eq!(normalize(&[1.0, 3.0]), Some(vec![0.25, 0.75]));
        assert_eq!(normalize(&[0.0, 0.0]), None);
    }

    #[test]
    fn blend_is_weighted_average() {
        let red = Rgb::new(200.0, 0.0, 0.0);
        let blue = Rgb::new(0.0, 0.0, 100.0);
        assert_eq!(blend(&[red, blue], &[1.0, 1.0]), Some(Rgb::new(100.0, 0.0, 50.0)));
        assert_eq!(blend(&[red, blue], &[0.3, 0.0]), Some(red));
        assert_eq!(blend(&[red, blue], &[0.0, 0.0]), None);
    }

    #[test]
    fn easer_moves_five_percent_of_remaining() {
        let mut e = ColorEaser::new(Rgb::BLACK, 0.05);
        e.set_target(Rgb::new(100.0, 200.0, 0.0));
        let first = e.step();
        assert!(first.max_channel_delta(&Rgb::new(5.0, 10.0, 0.0)) < 1e-9);
        let second = e.step();
        assert!((second.r - (5.0 + 95.0 * 0.05)).abs() < 1e-9);
        assert!(e.current().max_channel_delta(&e.target()) > 0.5);
    }

    #[test]
    fn easer_converges() {
        let mut e = ColorEaser::new(Rgb::WHITE, 0.05);
        e.set_target(Rgb::BLACK);
        for _ in 0..400 {
            e.step();
        }
        assert!(e.current().max_channel_delta(&e.target()) <= 0.01);
        assert_eq!(e.current().to_css(), "rgb(0, 0, 0)");
    }
}
