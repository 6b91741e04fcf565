use foundation::ids::ResourceId;
use serde::{Deserialize, Serialize};

use crate::residency::{LoadState, Settlement};
use crate::tier::Tier;

/// Media kind; selects the loader adapter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Image,
    Video,
    BackgroundImage,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Video => "video",
            ResourceKind::BackgroundImage => "background_image",
        }
    }

    pub fn parse(s: &str) -> Option<ResourceKind> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "image" | "img" => Some(ResourceKind::Image),
            "video" => Some(ResourceKind::Video),
            "background_image" | "background" => Some(ResourceKind::BackgroundImage),
            _ => None,
        }
    }
}

/// When a newly registered resource becomes eligible for admission.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// Joins the pending queue at registration (Critical tries a slot at once).
    Eager,
    /// Parked until someone calls `preload` (viewport-gated consumers).
    OnDemand,
}

/// Registry record for one media asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceDescriptor {
    pub id: ResourceId,
    pub source: String,
    pub kind: ResourceKind,
    pub tier: Tier,
    pub state: LoadState,
    /// `None` until the loader adapter settles.
    pub outcome: Option<Settlement>,
}

impl ResourceDescriptor {
    pub fn new(id: ResourceId, source: impl Into<String>, kind: ResourceKind, tier: Tier) -> Self {
        Self {
            id,
            source: source.into(),
            kind,
            tier,
            state: LoadState::Parked,
            outcome: None,
        }
    }

    pub fn loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    pub fn loading(&self) -> bool {
        self.state == LoadState::Loading
    }
}

/// Work handed to a loader adapter once a resource is admitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadJob {
    pub id: ResourceId,
    pub source: String,
    pub kind: ResourceKind,
    pub tier: Tier,
}

impl LoadJob {
    pub fn for_descriptor(desc: &ResourceDescriptor) -> Self {
        Self {
            id: desc.id.clone(),
            source: desc.source.clone(),
            kind: desc.kind,
            tier: desc.tier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ResourceDescriptor, ResourceKind};
    use crate::tier::Tier;

    #[test]
    fn new_descriptor_is_neither_loaded_nor_loading() {
        let d = ResourceDescriptor::new("hero".into(), "/x.jpg", ResourceKind::Image, Tier::High);
        assert!(!d.loaded());
        assert!(!d.loading());
        assert!(d.outcome.is_none());
    }

    #[test]
    fn kind_parse_accepts_markup_spellings() {
        assert_eq!(ResourceKind::parse("background-image"), Some(ResourceKind::BackgroundImage));
        assert_eq!(ResourceKind::parse("IMG"), Some(ResourceKind::Image));
        assert_eq!(ResourceKind::parse("audio"), None);
    }
}
