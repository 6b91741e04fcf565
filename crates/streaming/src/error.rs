use foundation::ids::ResourceId;
use thiserror::Error;

use crate::residency::LoadState;
use crate::tier::Tier;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamingError {
    #[error("unknown resource: {0}")]
    UnknownResource(ResourceId),

    #[error("resource {id} settled while {state:?}, not in flight")]
    NotInFlight { id: ResourceId, state: LoadState },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(String),

    #[error("capacity for tier {0} must be at least 1")]
    ZeroCapacity(Tier),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
