use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::residency::FailurePolicy;
use crate::tier::{DEFAULT_CAPACITIES, Tier, TierTable};

/// Root margin used by viewport-gated consumers when none is configured.
pub const DEFAULT_LAZY_MARGIN_PX: u32 = 200;

/// Resource-priority settings.
///
/// Every field has a default, so `{}` is a valid config. A `TierTable`
/// given in JSON must list all four tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Maximum concurrent in-flight loads per tier.
    pub capacities: TierTable<u32>,
    /// IntersectionObserver root margin for viewport-gated tiers.
    pub lazy_margin_px: TierTable<u32>,
    pub failure_policy: FailurePolicy,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            capacities: DEFAULT_CAPACITIES,
            lazy_margin_px: TierTable {
                critical: DEFAULT_LAZY_MARGIN_PX,
                high: DEFAULT_LAZY_MARGIN_PX,
                medium: DEFAULT_LAZY_MARGIN_PX,
                low: DEFAULT_LAZY_MARGIN_PX,
            },
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl LoaderConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: LoaderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (tier, cap) in self.capacities.iter() {
            if *cap == 0 {
                return Err(ConfigError::ZeroCapacity(tier));
            }
        }
        Ok(())
    }

    pub fn capacity(&self, tier: Tier) -> u32 {
        *self.capacities.get(tier)
    }

    pub fn lazy_margin_px(&self, tier: Tier) -> u32 {
        *self.lazy_margin_px.get(tier)
    }
}
