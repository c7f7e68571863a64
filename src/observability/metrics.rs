use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// In-memory counters, last-value gauges and latency samples for one session.
#[derive(Debug, Default)]
pub struct Metrics {
    counters: BTreeMap<String, u64>,
    timers_ms: BTreeMap<String, Vec<u64>>,
    gauges: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSummary {
    pub count: usize,
    pub mean_ms: f64,
    pub p95_ms: f64,
}

/// Shape embedded in the session artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub counters: BTreeMap<String, u64>,
    pub timers: BTreeMap<String, TimerSummary>,
    pub gauges: BTreeMap<String, f64>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(&mut self, name: &str, n: u64) {
        *self.counters.entry(name.to_string()).or_insert(0) += n;
    }

    pub fn observe_ms(&mut self, name: &str, ms: u64) {
        self.timers_ms.entry(name.to_string()).or_default().push(ms);
    }

    pub fn set_gauge(&mut self, name: &str, value: f64) {
        self.gauges.insert(name.to_string(), value);
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            counters: self.counters.clone(),
            timers: self
                .timers_ms
                .iter()
                .map(|(name, samples)| (name.clone(), summarize(samples)))
                .collect(),
            gauges: self.gauges.clone(),
        }
    }
}

/// Count, mean and nearest-rank p95 (index `floor(0.95 * (n - 1))` of the
/// sorted samples, no interpolation).
#[allow(clippy::cast_precision_loss)]
pub fn summarize(samples: &[u64]) -> TimerSummary {
    if samples.is_empty() {
        return TimerSummary {
            count: 0,
            mean_ms: 0.0,
            p95_ms: 0.0,
        };
    }

    let mut sorted = samples.to_vec();
    sorted.sort_unstable();
    let n = sorted.len();
    let p95_index = (95 * (n - 1)) / 100;
    let total: u64 = sorted.iter().sum();

    TimerSummary {
        count: n,
        mean_ms: total as f64 / n as f64,
        p95_ms: sorted[p95_index] as f64,
    }
}
