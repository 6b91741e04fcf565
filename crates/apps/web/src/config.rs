use sections::config::{BlendConfig, BlendConfigError};
use serde::Deserialize;
use streaming::config::LoaderConfig;
use streaming::error::ConfigError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SiteConfigError {
    #[error("invalid site config JSON: {0}")]
    Parse(String),
    #[error("loader: {0}")]
    Loader(#[from] ConfigError),
    #[error("blend: {0}")]
    Blend(#[from] BlendConfigError),
}

impl From<serde_json::Error> for SiteConfigError {
    fn from(err: serde_json::Error) -> Self {
        SiteConfigError::Parse(err.to_string())
    }
}

/// Page-level settings passed to `configure`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub loader: LoaderConfig,
    pub blend: BlendConfig,
}

impl SiteConfig {
    pub fn from_json(json: &str) -> Result<Self, SiteConfigError> {
        let config: SiteConfig = serde_json::from_str(json)?;
        config.loader.validate()?;
        config.blend.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{SiteConfig, SiteConfigError};
    use pretty_assertions::assert_eq;
    use streaming::error::ConfigError;
    use streaming::tier::Tier;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(SiteConfig::from_json("{}").unwrap(), SiteConfig::default());
    }

    #[test]
    fn nested_sections_parse() {
        let c = SiteConfig::from_json(
            r##"{
                "loader": {"lazy_margin_px": {"critical": 0, "high": 0, "medium": 300, "low": 600}},
                "blend": {"nav_interval_ms": 150, "sections": [{"id": "roster", "color": "#222"}]}
            }"##,
        )
        .unwrap();
        assert_eq!(c.loader.lazy_margin_px(Tier::Low), 600);
        assert_eq!(c.blend.nav_interval_ms, 150.0);
        assert_eq!(c.blend.sections.len(), 1);
    }

    #[test]
    fn nested_validation_errors_surface() {
        let err = SiteConfig::from_json(
            r#"{"loader": {"capacities": {"critical": 4, "high": 0, "medium": 2, "low": 1}}}"#,
        )
        .unwrap_err();
        assert_eq!(err, SiteConfigError::Loader(ConfigError::ZeroCapacity(Tier::High)));
        assert!(matches!(
            SiteConfig::from_json(r#"{"blend": {"easing_rate": 2}}"#),
            Err(SiteConfigError::Blend(_))
        ));
    }
}
