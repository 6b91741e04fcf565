use foundation::bounds::Span;
use foundation::color::Rgb;

/// Measured position of one page section for the current tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSample {
    pub id: String,
    /// Section box in viewport coordinates (as from `getBoundingClientRect`).
    pub span: Span,
    pub color: Rgb,
}

impl SectionSample {
    pub fn new(id: impl Into<String>, span: Span, color: Rgb) -> Self {
        Self {
            id: id.into(),
            span,
            color,
        }
    }
}

/// Fraction of the section's own height that lies inside the viewport.
pub fn visible_fraction(section: &Span, viewport: &Span) -> f64 {
    if section.height <= 0.0 {
        return 0.0;
    }
    section.overlap(viewport) / section.height
}

/// 1 when the section is centred in the viewport, falling linearly to 0 once
/// the centres are half a viewport plus half a section apart.
pub fn centering_factor(section: &Span, viewport: &Span) -> f64 {
    let reach = viewport.height * 0.5 + section.height * 0.5;
    if reach <= 0.0 {
        return 0.0;
    }
    let distance = (section.center() - viewport.center()).abs();
    1.0 - (distance / reach).clamp(0.0, 1.0)
}

/// `visible_fraction × centering_factor^exponent`.
pub fn visibility_score(section: &Span, viewport: &Span, exponent: f64) -> f64 {
    visible_fraction(section, viewport) * centering_factor(section, viewport).powf(exponent)
}

/// Index of the highest raw score. First wins on ties; `None` when nothing
/// scores above zero.
pub fn most_visible(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &s) in scores.iter().enumerate() {
        if s <= 0.0 {
            continue;
        }
        match best {
            Some((_, b)) if s <= b => {}
            _ => best = Some((i, s)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::{centering_factor, most_visible, visibility_score, visible_fraction};
    use foundation::bounds::Span;

    const VIEWPORT: Span = Span {
        top: 0.0,
        height: 800.0,
    };

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn centred_full_section_scores_one() {
        let s = Span::new(200.0, 400.0);
        assert_eq!(visible_fraction(&s, &VIEWPORT), 1.0);
        assert_eq!(centering_factor(&s, &VIEWPORT), 1.0);
        assert_eq!(visibility_score(&s, &VIEWPORT, 1.5), 1.0);
    }

    #[test]
    fn off_screen_section_scores_zero() {
        let s = Span::new(1200.0, 400.0);
        assert_eq!(visible_fraction(&s, &VIEWPORT), 0.0);
        assert_eq!(visibility_score(&s, &VIEWPORT, 1.5), 0.0);
    }

    #[test]
    fn half_visible_section() {
        // Section 600..1000: 200px of 400 visible, centre 800 vs 400.
        let s = Span::new(600.0, 400.0);
        assert!(close(visible_fraction(&s, &VIEWPORT), 0.5));
        let c = centering_factor(&s, &VIEWPORT);
        assert!(close(c, 1.0 - 400.0 / 600.0));
        assert!(close(visibility_score(&s, &VIEWPORT, 1.5), 0.5 * c.powf(1.5)));
    }

    #[test]
    fn zero_height_section_is_invisible() {
        let s = Span::new(100.0, 0.0);
        assert_eq!(visibility_score(&s, &VIEWPORT, 1.5), 0.0);
    }

    #[test]
    fn most_visible_prefers_first_on_ties() {
        assert_eq!(most_visible(&[0.2, 0.7, 0.7]), Some(1));
        assert_eq!(most_visible(&[0.0, 0.0]), None);
        assert_eq!(most_visible(&[]), None);
    }
}
