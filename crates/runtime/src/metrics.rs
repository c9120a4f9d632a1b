use std::collections::BTreeMap;

use serde::Serialize;

/// Counter names maintained by the synchronization engine.
pub mod names {
    pub const SYNC_PASSES: &str = "sync.passes";
    pub const SYNC_LAYERS: &str = "sync.layers";
    pub const SYNC_DATAVIEWS: &str = "sync.dataviews";
    pub const SYNC_ANALYSIS_NODES: &str = "sync.analysis_nodes";
    pub const ERRORS_REPORTED: &str = "errors.reported";
    pub const ERRORS_DROPPED: &str = "errors.dropped";
    pub const ERRORS_GLOBAL: &str = "errors.global";
    pub const LEGENDS_MALFORMED: &str = "legends.malformed";
    pub const REMOTE_LAYERS: &str = "remote.layers";
}

/// Deterministic counters and gauges.
///
/// Sorted maps keep snapshots in a stable order across runs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Metrics {
    counters: BTreeMap<&'static str, u64>,
    gauges: BTreeMap<&'static str, i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub counters: Vec<(String, u64)>,
    pub gauges: Vec<(String, i64)>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn inc_counter(&mut self, name: &'static str, by: u64) {
        *self.counters.entry(name).or_insert(0) += by;
    }

    pub fn gauge(&self, name: &str) -> Option<i64> {
        self.gauges.get(name).copied()
    }

    pub fn set_gauge(&mut self, name: &'static str, value: i64) {
        self.gauges.insert(name, value);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            counters: self
                .counters
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
            gauges: self.gauges.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Metrics, names};

    #[test]
    fn counters_accumulate() {
        let mut m = Metrics::new();
        m.inc_counter(names::SYNC_PASSES, 1);
        m.inc_counter(names::SYNC_PASSES, 2);
        assert_eq!(m.counter(names::SYNC_PASSES), 3);
        assert_eq!(m.counter("missing"), 0);
    }

    #[test]
    fn gauges_overwrite() {
        let mut m = Metrics::new();
        assert_eq!(m.gauge(names::REMOTE_LAYERS), None);
        m.set_gauge(names::REMOTE_LAYERS, 4);
        m.set_gauge(names::REMOTE_LAYERS, 2);
        assert_eq!(m.gauge(names::REMOTE_LAYERS), Some(2));
    }

    #[test]
    fn snapshot_is_stably_sorted() {
        let mut m = Metrics::new();
        m.inc_counter(names::SYNC_PASSES, 1);
        m.inc_counter(names::ERRORS_DROPPED, 1);

        let snap = m.snapshot();
        assert_eq!(
            snap.counters,
            vec![
                ("errors.dropped".to_string(), 1),
                ("sync.passes".to_string(), 1)
            ]
        );
    }
}
