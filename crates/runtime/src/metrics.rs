use std::collections::BTreeMap;

use serde::Serialize;

/// Deterministic counters and gauges.
///
/// Sorted maps keep snapshots stably ordered so they can be diffed in tests
/// and dumped as JSON for a debug overlay.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Metrics {
    counters: BTreeMap<String, u64>,
    gauges: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub counters: BTreeMap<String, u64>,
    pub gauges: BTreeMap<String, i64>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn inc_counter(&mut self, name: impl Into<String>, by: u64) {
        *self.counters.entry(name.into()).or_insert(0) += by;
    }

    pub fn gauge(&self, name: &str) -> Option<i64> {
        self.gauges.get(name).copied()
    }

    pub fn set_gauge(&mut self, name: impl Into<String>, value: i64) {
        self.gauges.insert(name.into(), value);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            counters: self.counters.clone(),
            gauges: self.gauges.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Metrics;

    #[test]
    fn counters_accumulate() {
        let mut m = Metrics::new();
        m.inc_counter("loads.started", 1);
        m.inc_counter("loads.started", 2);
        assert_eq!(m.counter("loads.started"), 3);
        assert_eq!(m.counter("missing"), 0);
    }

    #[test]
    fn gauges_overwrite() {
        let mut m = Metrics::new();
        assert_eq!(m.gauge("queue.len"), None);
        m.set_gauge("queue.len", 10);
        m.set_gauge("queue.len", 11);
        assert_eq!(m.gauge("queue.len"), Some(11));
    }

    #[test]
    fn snapshot_json_is_sorted() {
        let mut m = Metrics::new();
        m.inc_counter("b", 1);
        m.inc_counter("a", 1);
        m.set_gauge("z", -1);
        let json = serde_json::to_string(&m.snapshot()).unwrap();
        assert_eq!(json, r#"{"counters":{"a":1,"b":1},"gauges":{"z":-1}}"#);
    }
}
