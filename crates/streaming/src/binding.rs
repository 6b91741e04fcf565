use foundation::ids::ResourceId;
use serde::Deserialize;

use crate::config::LoaderConfig;
use crate::descriptor::{Activation, ResourceKind};
use crate::driver::PriorityContext;
use crate::tier::Tier;
use crate::waiters::Preload;

/// How a consumer decides when to ask for its resource.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ActivationPlan {
    /// Above-the-fold content: preload at mount regardless of visibility.
    Immediate,
    /// Preload the first time the element comes within `root_margin_px` of
    /// the viewport, then stop observing.
    OnIntersect { root_margin_px: u32 },
}

impl ActivationPlan {
    pub fn for_tier(tier: Tier, config: &LoaderConfig) -> Self {
        match tier {
            Tier::Critical | Tier::High => ActivationPlan::Immediate,
            Tier::Medium | Tier::Low => ActivationPlan::OnIntersect {
                root_margin_px: config.lazy_margin_px(tier),
            },
        }
    }

    pub fn activation(self) -> Activation {
        match self {
            ActivationPlan::Immediate => Activation::Eager,
            ActivationPlan::OnIntersect { .. } => Activation::OnDemand,
        }
    }

    /// `rootMargin` value for an IntersectionObserver, if one is needed.
    pub fn root_margin_css(self) -> Option<String> {
        match self {
            ActivationPlan::Immediate => None,
            ActivationPlan::OnIntersect { root_margin_px } => Some(format!("{root_margin_px}px")),
        }
    }
}

/// What a consumer asks to load.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MediaSpec {
    /// Defaults to the source locator.
    #[serde(default)]
    pub id: Option<ResourceId>,
    pub source: String,
    pub kind: ResourceKind,
    pub tier: Tier,
}

impl MediaSpec {
    pub fn new(source: impl Into<String>, kind: ResourceKind, tier: Tier) -> Self {
        Self {
            id: None,
            source: source.into(),
            kind,
            tier,
        }
    }

    pub fn with_id(mut self, id: impl Into<ResourceId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn resolved_id(&self) -> ResourceId {
        self.id
            .clone()
            .unwrap_or_else(|| ResourceId::from_source(&self.source))
    }
}

/// What a consumer should currently render.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MediaView {
    Placeholder,
    Media,
}

/// Framework-free state of one priority image/video/background consumer.
///
/// The DOM layer owns the element and observer; this owns the decision of
/// when to register, when to preload and what to show.
#[derive(Debug)]
pub struct MediaBinding {
    ctx: PriorityContext,
    id: ResourceId,
    kind: ResourceKind,
    plan: ActivationPlan,
    triggered: bool,
}

impl MediaBinding {
    /// Registers the resource and, for immediate plans, requests it.
    ///
    /// Returns the preload future when one was issued at mount.
    pub fn mount(ctx: &PriorityContext, spec: &MediaSpec) -> (Self, Option<Preload>) {
        let plan = ActivationPlan::for_tier(spec.tier, &ctx.config());
        let id = spec.resolved_id();
        ctx.register_with(
            id.clone(),
            spec.source.clone(),
            spec.kind,
            spec.tier,
            plan.activation(),
        );

        let mut binding = Self {
            ctx: ctx.clone(),
            id,
            kind: spec.kind,
            plan,
            triggered: false,
        };
        let preload = match plan {
            ActivationPlan::Immediate => Some(binding.trigger()),
            ActivationPlan::OnIntersect { .. } => None,
        };
        // Another consumer may already have loaded this id; nothing to wait for.
        if binding.view() == MediaView::Media {
            binding.triggered = true;
        }
        (binding, preload)
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn plan(&self) -> ActivationPlan {
        self.plan
    }

    /// True while an intersection observer should stay attached.
    pub fn wants_observer(&self) -> bool {
        matches!(self.plan, ActivationPlan::OnIntersect { .. }) && !self.triggered
    }

    /// Intersection callback. Fires the preload at most once.
    pub fn on_intersect(&mut self) -> Option<Preload> {
        if !self.wants_observer() {
            return None;
        }
        Some(self.trigger())
    }

    pub fn view(&self) -> MediaView {
        if self.ctx.is_loaded(self.id.as_str()) {
            MediaView::Media
        } else {
            MediaView::Placeholder
        }
    }

    fn trigger(&mut self) -> Preload {
        self.triggered = true;
        self.ctx.preload(self.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{ActivationPlan, MediaBinding, MediaSpec, MediaView};
    use crate::config::LoaderConfig;
    use crate::descriptor::ResourceKind;
    use crate::driver::test_support::context;
    use crate::residency::LoadState;
    use crate::tier::Tier;
    use futures::FutureExt;

    #[test]
    fn plan_by_tier() {
        let config = LoaderConfig::default();
        assert_eq!(ActivationPlan::for_tier(Tier::Critical, &config), ActivationPlan::Immediate);
        assert_eq!(ActivationPlan::for_tier(Tier::High, &config), ActivationPlan::Immediate);
        assert_eq!(
            ActivationPlan::for_tier(Tier::Low, &config),
            ActivationPlan::OnIntersect { root_margin_px: 200 }
        );
        assert_eq!(
            ActivationPlan::for_tier(Tier::Medium, &config).root_margin_css(),
            Some("200px".to_string())
        );
    }

    #[test]
    fn id_defaults_to_source() {
        let spec = MediaSpec::new("/img/a.jpg", ResourceKind::Image, Tier::Low);
        assert_eq!(spec.resolved_id().as_str(), "/img/a.jpg");
        assert_eq!(spec.with_id("cover").resolved_id().as_str(), "cover");
    }

    #[test]
    fn immediate_binding_preloads_at_mount() {
        let (ctx, adapter, deferrer) = context(LoaderConfig::default());
        let spec = MediaSpec::new("/hero.jpg", ResourceKind::Image, Tier::High);
        let (binding, preload) = MediaBinding::mount(&ctx, &spec);
        let preload = preload.expect("immediate plan preloads");
        assert!(!binding.wants_observer());
        assert_eq!(binding.view(), MediaView::Placeholder);

        deferrer.run_all();
        adapter.take("/hero.jpg").unwrap().loaded();
        assert_eq!(preload.now_or_never(), Some(()));
        assert_eq!(binding.view(), MediaView::Media);
    }

    #[test]
    fn lazy_binding_never_loads_without_intersection() {
        let (ctx, adapter, deferrer) = context(LoaderConfig::default());
        let spec = MediaSpec::new("/gallery.jpg", ResourceKind::Image, Tier::Medium);
        let (binding, preload) = MediaBinding::mount(&ctx, &spec);
        assert!(preload.is_none());
        assert!(binding.wants_observer());

        deferrer.run_all();
        ctx.flush();
        assert!(adapter.started_ids().is_empty());
        assert_eq!(ctx.state("/gallery.jpg"), Some(LoadState::Parked));
        assert_eq!(binding.view(), MediaView::Placeholder);
    }

    #[test]
    fn lazy_binding_on_loaded_id_shows_media_without_observer() {
        let (ctx, adapter, deferrer) = context(LoaderConfig::default());
        let hero = MediaSpec::new("/a.jpg", ResourceKind::Image, Tier::Critical);
        let (_first, _) = MediaBinding::mount(&ctx, &hero);
        deferrer.run_all();
        adapter.take("/a.jpg").unwrap().loaded();

        let thumb = MediaSpec::new("/a.jpg", ResourceKind::Image, Tier::Low);
        let (mut second, preload) = MediaBinding::mount(&ctx, &thumb);
        assert!(preload.is_none());
        assert_eq!(second.view(), MediaView::Media);
        assert!(!second.wants_observer());
        assert!(second.on_intersect().is_none());
        assert_eq!(adapter.started_ids(), vec!["/a.jpg"]);
    }

    #[test]
    fn intersection_fires_once() {
        let (ctx, adapter, deferrer) = context(LoaderConfig::default());
        let spec = MediaSpec::new("/tour.mp4", ResourceKind::Video, Tier::Low).with_id("tour");
        let (mut binding, _) = MediaBinding::mount(&ctx, &spec);

        let first = binding.on_intersect();
        assert!(first.is_some());
        assert!(binding.on_intersect().is_none());
        assert!(!binding.wants_observer());

        deferrer.run_all();
        assert_eq!(adapter.started_ids(), vec!["tour"]);
        adapter.take("tour").unwrap().failed("network");
        assert_eq!(first.unwrap().now_or_never(), Some(()));
        assert_eq!(binding.view(), MediaView::Media);
    }
}
