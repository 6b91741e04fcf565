use foundation::bounds::Span;
use foundation::color::Rgb;
use foundation::time::Time;
use runtime::frame::{Frame, FrameClock};
use runtime::throttle::Throttle;
use tracing::{debug, trace};

use crate::blend::{ColorEaser, blend};
use crate::config::BlendConfig;
use crate::score::{SectionSample, most_visible, visibility_score};

/// What the page should apply after one animation frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub frame: Frame,
    pub background: Rgb,
    /// Set when the rounded background differs from the last one emitted,
    /// so callers can skip redundant style writes.
    pub background_changed: bool,
    pub active_section: Option<String>,
    pub active_changed: bool,
}

/// Owner of the section-driven background colour and nav highlight.
///
/// Driven from a single animation-frame loop: each `on_frame` call may
/// refresh the blend target and the active section (each through its own
/// throttle) and then eases the current colour one step. It is the only
/// writer of the background colour.
#[derive(Debug, Clone)]
pub struct BlendController {
    config: BlendConfig,
    easer: ColorEaser,
    blend_throttle: Throttle,
    nav_throttle: Throttle,
    clock: FrameClock,
    active: Option<String>,
    last_emitted: Option<[u8; 3]>,
}

impl BlendController {
    pub fn new(config: BlendConfig) -> Self {
        Self {
            easer: ColorEaser::new(config.initial_color, config.easing_rate),
            blend_throttle: Throttle::new(config.blend_interval_ms),
            nav_throttle: Throttle::new(config.nav_interval_ms),
            clock: FrameClock::new(),
            active: None,
            last_emitted: None,
            config,
        }
    }

    pub fn config(&self) -> &BlendConfig {
        &self.config
    }

    pub fn current_color(&self) -> Rgb {
        self.easer.current()
    }

    pub fn target_color(&self) -> Rgb {
        self.easer.target()
    }

    pub fn active_section(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Raw visibility scores of `sections` against `viewport`.
    pub fn scores(&self, viewport: &Span, sections: &[SectionSample]) -> Vec<f64> {
        sections
            .iter()
            .map(|s| visibility_score(&s.span, viewport, self.config.centering_exponent))
            .collect()
    }

    /// Forces both recomputes on the next frame (e.g. after a resize).
    pub fn invalidate(&mut self) {
        self.blend_throttle.reset();
        self.nav_throttle.reset();
    }

    /// Advances one animation frame.
    ///
    /// `sample` measures the sections; it is only called when at least one
    /// throttle lets a recompute through.
    pub fn on_frame<F>(&mut self, now: Time, viewport: Span, sample: F) -> FrameOutput
    where
        F: FnOnce() -> Vec<SectionSample>,
    {
        let frame = self.clock.tick(now);
        let refresh_blend = self.blend_throttle.ready(now);
        let refresh_nav = self.nav_throttle.ready(now);

        let mut active_changed = false;
        if refresh_blend || refresh_nav {
            let sections = sample();
            let scores = self.scores(&viewport, &sections);

            if refresh_blend {
                let colors: Vec<Rgb> = sections.iter().map(|s| s.color).collect();
                if let Some(target) = blend(&colors, &scores) {
                    trace!(target = %target.to_hex(), "blend target");
                    self.easer.set_target(target);
                }
            }

            if refresh_nav {
                let active = most_visible(&scores).map(|i| sections[i].id.clone());
                if active != self.active {
                    debug!(from = ?self.active, to = ?active, "active section");
                    self.active = active;
                    active_changed = true;
                }
            }
        }

        let background = self.easer.step();
        let rounded = background.to_u8();
        let background_changed = self.last_emitted != Some(rounded);
        self.last_emitted = Some(rounded);

        FrameOutput {
            frame,
            background,
            background_changed,
            active_section: self.active.clone(),
            active_changed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BlendController;
    use crate::config::BlendConfig;
    use crate::score::SectionSample;
    use foundation::bounds::Span;
    use foundation::color::Rgb;
    use foundation::time::Time;
    use std::cell::Cell;

    const VIEWPORT: Span = Span {
        top: 0.0,
        height: 800.0,
    };

    fn red() -> Rgb {
        Rgb::new(200.0, 0.0, 0.0)
    }

    fn blue() -> Rgb {
        Rgb::new(0.0, 0.0, 200.0)
    }

    /// Two sections; `scroll` moves the page up.
    fn page(scroll: f64) -> Vec<SectionSample> {
        vec![
            SectionSample::new("hero", Span::new(0.0 - scroll, 800.0), red()),
            SectionSample::new("shows", Span::new(800.0 - scroll, 800.0), blue()),
        ]
    }

    #[test]
    fn first_frame_targets_visible_section() {
        let mut c = BlendController::new(BlendConfig::default());
        let out = c.on_frame(Time(0.0), VIEWPORT, || page(0.0));
        assert_eq!(c.target_color(), red());
        assert_eq!(out.active_section.as_deref(), Some("hero"));
        assert!(out.active_changed);
        // One 5% step from black toward red.
        assert!((out.background.r - 10.0).abs() < 1e-9);
    }

    #[test]
    fn halfway_scroll_blends_evenly() {
        let mut c = BlendController::new(BlendConfig::default());
        c.on_frame(Time(0.0), VIEWPORT, || page(400.0));
        let t = c.target_color();
        assert!((t.r - 100.0).abs() < 1e-9);
        assert!((t.b - 100.0).abs() < 1e-9);
    }

    #[test]
    fn sampling_is_throttled_per_concern() {
        let mut c = BlendController::new(BlendConfig::default());
        let calls = Cell::new(0);
        let frame = |c: &mut BlendController, t: f64| {
            c.on_frame(Time(t), VIEWPORT, || {
                calls.set(calls.get() + 1);
                page(0.0)
            })
        };

        frame(&mut c, 0.0); // both due
        frame(&mut c, 16.0); // neither
        frame(&mut c, 50.0); // blend only
        frame(&mut c, 66.0); // neither
        frame(&mut c, 100.0); // blend and nav
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn active_section_follows_scroll_on_nav_ticks() {
        let mut c = BlendController::new(BlendConfig::default());
        c.on_frame(Time(0.0), VIEWPORT, || page(0.0));
        // Blend refreshes at 50ms but nav does not; active stays "hero".
        let out = c.on_frame(Time(50.0), VIEWPORT, || page(700.0));
        assert_eq!(out.active_section.as_deref(), Some("hero"));
        assert!(!out.active_changed);

        let out = c.on_frame(Time(100.0), VIEWPORT, || page(700.0));
        assert_eq!(out.active_section.as_deref(), Some("shows"));
        assert!(out.active_changed);
    }

    #[test]
    fn no_visible_sections_keeps_target() {
        let mut c = BlendController::new(BlendConfig {
            initial_color: Rgb::WHITE,
            ..BlendConfig::default()
        });
        let out = c.on_frame(Time(0.0), VIEWPORT, || page(5000.0));
        assert_eq!(c.target_color(), Rgb::WHITE);
        assert_eq!(out.active_section, None);
        assert!(out.background_changed);

        let out = c.on_frame(Time(16.0), VIEWPORT, Vec::new);
        assert!(!out.background_changed);
    }

    #[test]
    fn invalidate_forces_recompute() {
        let mut c = BlendController::new(BlendConfig::default());
        c.on_frame(Time(0.0), VIEWPORT, || page(0.0));
        c.invalidate();
        let mut sampled = false;
        c.on_frame(Time(1.0), VIEWPORT, || {
            sampled = true;
            page(0.0)
        });
        assert!(sampled);
    }
}
