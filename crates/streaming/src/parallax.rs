use foundation::ids::ResourceId;
use serde::Deserialize;

use crate::binding::{MediaBinding, MediaSpec, MediaView};
use crate::descriptor::ResourceKind;
use crate::driver::PriorityContext;
use crate::tier::Tier;
use crate::waiters::Preload;

/// One background layer of a parallax stack.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParallaxLayer {
    pub source: String,
    /// Fraction of the scroll distance the layer moves by (0 = fixed).
    pub speed: f64,
    /// Defaults to Critical for the first layer and High for the rest.
    #[serde(default)]
    pub tier: Option<Tier>,
}

/// Layered background whose layers load through the priority scheduler as
/// `parallax-layer-{i}` background images.
#[derive(Debug)]
pub struct ParallaxBackground {
    layers: Vec<(MediaBinding, f64)>,
}

impl ParallaxBackground {
    pub fn default_tier(index: usize) -> Tier {
        if index == 0 { Tier::Critical } else { Tier::High }
    }

    /// Registers every layer. Returns the preloads issued at mount, tagged
    /// with their layer index.
    pub fn mount(ctx: &PriorityContext, layers: &[ParallaxLayer]) -> (Self, Vec<(usize, Preload)>) {
        let mut bound = Vec::with_capacity(layers.len());
        let mut preloads = Vec::new();
        for (i, layer) in layers.iter().enumerate() {
            let tier = layer.tier.unwrap_or_else(|| Self::default_tier(i));
            let spec = MediaSpec::new(layer.source.clone(), ResourceKind::BackgroundImage, tier)
                .with_id(ResourceId::parallax_layer(i));
            let (binding, preload) = MediaBinding::mount(ctx, &spec);
            preloads.extend(preload.map(|p| (i, p)));
            bound.push((binding, layer.speed));
        }
        (Self { layers: bound }, preloads)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// True while some layer still waits for the stack to come into view.
    pub fn wants_observer(&self) -> bool {
        self.layers.iter().any(|(b, _)| b.wants_observer())
    }

    /// Intersection callback for the whole stack: requests every layer that
    /// was waiting for it.
    pub fn on_intersect(&mut self) -> Vec<(usize, Preload)> {
        self.layers
            .iter_mut()
            .enumerate()
            .filter_map(|(i, (b, _))| b.on_intersect().map(|p| (i, p)))
            .collect()
    }

    /// Vertical translation (px) for each layer at the given scroll offset.
    pub fn offsets(&self, scroll_y: f64) -> Vec<f64> {
        self.layers
            .iter()
            .map(|(_, speed)| scroll_y * speed)
            .collect()
    }

    pub fn view(&self, index: usize) -> Option<MediaView> {
        self.layers.get(index).map(|(b, _)| b.view())
    }

    pub fn views(&self) -> Vec<MediaView> {
        self.layers.iter().map(|(b, _)| b.view()).collect()
    }
}
