use serde::{Deserialize, Serialize};

/// Lifecycle of a registered resource.
///
/// Parked → Queued → Loading → Loaded. Queued is skipped when a slot is free
/// at the moment the resource is requested. `Failed` is only reachable under
/// [`FailurePolicy::KeepPlaceholder`]. Loaded and Failed are terminal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Parked,
    Queued,
    Loading,
    Loaded,
    Failed,
}

impl LoadState {
    pub fn is_terminal(self) -> bool {
        matches!(self, LoadState::Loaded | LoadState::Failed)
    }
}

/// What a loader adapter reported when the load attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Settlement {
    Loaded,
    Failed { reason: String },
}

impl Settlement {
    pub fn failed(reason: impl Into<String>) -> Self {
        Settlement::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Settlement::Failed { .. })
    }
}

/// How a failed load is reflected in the `loaded` flag.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// A broken asset counts as loaded so consumers drop the placeholder.
    #[default]
    SettleAsLoaded,
    /// A broken asset ends in `Failed`; `is_loaded` stays false.
    KeepPlaceholder,
}

impl FailurePolicy {
    pub fn terminal_state(self, settlement: &Settlement) -> LoadState {
        match (settlement, self) {
            (Settlement::Loaded, _) => LoadState::Loaded,
            (Settlement::Failed { .. }, FailurePolicy::SettleAsLoaded) => LoadState::Loaded,
            (Settlement::Failed { .. }, FailurePolicy::KeepPlaceholder) => LoadState::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FailurePolicy, LoadState, Settlement};

    #[test]
    fn default_policy_treats_failure_as_loaded() {
        let failed = Settlement::failed("404");
        assert_eq!(FailurePolicy::default().terminal_state(&failed), LoadState::Loaded);
        assert_eq!(
            FailurePolicy::KeepPlaceholder.terminal_state(&failed),
            LoadState::Failed
        );
        assert_eq!(
            FailurePolicy::KeepPlaceholder.terminal_state(&Settlement::Loaded),
            LoadState::Loaded
        );
    }

    #[test]
    fn settlement_serializes_tagged() {
        let json = serde_json::to_string(&Settlement::failed("decode")).unwrap();
        assert_eq!(json, r#"{"outcome":"failed","reason":"decode"}"#);
    }
}
