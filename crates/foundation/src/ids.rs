use serde::{Deserialize, Serialize};

/// Consumer-chosen key of a media resource (e.g. `"parallax-layer-0"`).
///
/// Ordered so registries keyed by it iterate deterministically.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        ResourceId(id.into())
    }

    /// Id used when a consumer does not supply one: the source locator itself.
    pub fn from_source(source: &str) -> Self {
        ResourceId(source.trim().to_string())
    }

    /// Id of the `index`-th parallax layer.
    pub fn parallax_layer(index: usize) -> Self {
        ResourceId(format!("parallax-layer-{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        ResourceId::new(s)
    }
}

impl From<String> for ResourceId {
    fn from(s: String) -> Self {
        ResourceId(s)
    }
}

impl std::borrow::Borrow<str> for ResourceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
