use foundation::color::Rgb;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlendConfigError {
    #[error("invalid blend config JSON: {0}")]
    Parse(String),

    #[error("{field} must be a finite, non-negative number (got {value})")]
    InvalidNumber { field: &'static str, value: String },

    #[error("easing_rate must be in (0, 1] (got {0})")]
    EasingRate(String),

    #[error("duplicate section id: {0}")]
    DuplicateSection(String),
}

impl From<serde_json::Error> for BlendConfigError {
    fn from(err: serde_json::Error) -> Self {
        BlendConfigError::Parse(err.to_string())
    }
}

/// A page section taking part in the background blend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionStyle {
    /// DOM id of the section element.
    pub id: String,
    pub color: Rgb,
}

/// Background blend and nav-highlight settings.
///
/// Each recompute concern has its own interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendConfig {
    /// Minimum time between background target recomputes.
    pub blend_interval_ms: f64,
    /// Minimum time between active-section recomputes.
    pub nav_interval_ms: f64,
    /// Fraction of the remaining distance covered per animation frame.
    pub easing_rate: f64,
    pub centering_exponent: f64,
    pub initial_color: Rgb,
    pub sections: Vec<SectionStyle>,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            blend_interval_ms: 50.0,
            nav_interval_ms: 100.0,
            easing_rate: 0.05,
            centering_exponent: 1.5,
            initial_color: Rgb::BLACK,
            sections: Vec::new(),
        }
    }
}

impl BlendConfig {
    pub fn from_json(json: &str) -> Result<Self, BlendConfigError> {
        let config: BlendConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BlendConfigError> {
        let check = |field: &'static str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(BlendConfigError::InvalidNumber {
                    field,
                    value: value.to_string(),
                })
            }
        };
        check("blend_interval_ms", self.blend_interval_ms)?;
        check("nav_interval_ms", self.nav_interval_ms)?;
        check("centering_exponent", self.centering_exponent)?;

        if !(self.easing_rate > 0.0 && self.easing_rate <= 1.0) {
            return Err(BlendConfigError::EasingRate(self.easing_rate.to_string()));
        }

        let mut seen = std::collections::BTreeSet::new();
        for s in &self.sections {
            if !seen.insert(s.id.as_str()) {
                return Err(BlendConfigError::DuplicateSection(s.id.clone()));
            }
        }
        Ok(())
    }

    pub fn section_color(&self, id: &str) -> Option<Rgb> {
        self.sections.iter().find(|s| s.id == id).map(|s| s.color)
    }
}
