/// Vertical extent of a box in page/viewport pixels.
///
/// Only the vertical axis matters for scroll-driven visibility, so this is a
/// 1D interval `[top, top + height)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Span {
    pub top: f64,
    pub height: f64,
}

impl Span {
    pub fn new(top: f64, height: f64) -> Self {
        Span {
            top,
            height: height.max(0.0),
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> f64 {
        self.top + self.height * 0.5
    }

    /// Length of the intersection with `other` (0 when disjoint).
    pub fn overlap(&self, other: &Span) -> f64 {
        let top = self.top.max(other.top);
        let bottom = self.bottom().min(other.bottom());
        (bottom - top).max(0.0)
    }

    /// Grows the span by `margin` on both ends (IntersectionObserver-style root margin).
    pub fn expand(&self, margin: f64) -> Span {
        Span::new(self.top - margin, self.height + 2.0 * margin)
    }

    pub fn intersects(&self, other: &Span) -> bool {
        self.top < other.bottom() && other.top < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::Span;

    #[test]
    fn overlap_of_disjoint_spans_is_zero() {
        let a = Span::new(0.0, 100.0);
        let b = Span::new(200.0, 50.0);
        assert_eq!(a.overlap(&b), 0.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn overlap_of_partial_spans() {
        let viewport = Span::new(0.0, 800.0);
        let section = Span::new(600.0, 400.0);
        assert_eq!(section.overlap(&viewport), 200.0);
        assert_eq!(section.center(), 800.0);
    }

    #[test]
    fn expand_applies_margin_both_ends() {
        let s = Span::new(100.0, 50.0).expand(200.0);
        assert_eq!(s, Span::new(-100.0, 450.0));
        assert!(s.intersects(&Span::new(300.0, 10.0)));
    }

    #[test]
    fn negative_height_is_clamped() {
        assert_eq!(Span::new(0.0, -5.0).height, 0.0);
    }
}
