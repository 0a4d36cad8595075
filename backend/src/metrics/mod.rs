//! In-process metric registry.
//!
//! Holds three kinds of named metrics:
//! - gauges: closures evaluated on demand, registered once per name
//! - counters: monotonic invocation counts
//! - timers: count, total and maximum of recorded durations
//!
//! Components receive an `Arc<MetricRegistry>` from the composition root and
//! register their metrics against it; exporters read [`MetricRegistry::snapshot`].

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Gauge callback. Must be cheap; it runs on every read.
pub type GaugeFn = Arc<dyn Fn() -> u64 + Send + Sync>;

/// Aggregated timings for one timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub count: u64,
    pub total_micros: u64,
    pub max_micros: u64,
}

impl TimerSnapshot {
    fn record(&mut self, elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.count += 1;
        self.total_micros = self.total_micros.saturating_add(micros);
        self.max_micros = self.max_micros.max(micros);
    }
}

/// Point-in-time values of every registered metric, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub gauges: BTreeMap<String, u64>,
    pub counters: BTreeMap<String, u64>,
    pub timers: BTreeMap<String, TimerSnapshot>,
}

/// Thread-safe registry of gauges, counters and timers.
#[derive(Default)]
pub struct MetricRegistry {
    gauges: RwLock<BTreeMap<String, GaugeFn>>,
    counters: RwLock<BTreeMap<String, Arc<AtomicU64>>>,
    timers: RwLock<BTreeMap<String, TimerSnapshot>>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new registry wrapped in Arc for sharing.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a gauge unless one with the same name already exists.
    ///
    /// Returns `true` if the gauge was registered, `false` if the name was
    /// taken (the existing gauge is kept).
    pub fn register_gauge<F>(&self, name: impl Into<String>, gauge: F) -> bool
    where
        F: Fn() -> u64 + Send + Sync + 'static,
    {
        let mut gauges = self.gauges.write();
        let name = name.into();
        if gauges.contains_key(&name) {
            return false;
        }
        gauges.insert(name, Arc::new(gauge));
        true
    }

    /// Evaluate a gauge.
    pub fn gauge_value(&self, name: &str) -> Option<u64> {
        // Evaluate outside the lock so gauges may read other metrics.
        let gauge = self.gauges.read().get(name).cloned()?;
        Some(gauge())
    }

    /// Increment a counter, creating it at zero first if needed.
    pub fn increment(&self, name: &str) {
        if let Some(counter) = self.counters.read().get(name) {
            counter.fetch_add(1, Ordering::Relaxed);
            return;
        }
        self.counters
            .write()
            .entry(name.to_string())
            .or_default()
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Current counter value; zero for counters never incremented.
    pub fn counter(&self, name: &str) -> u64 {
        self.counters
            .read()
            .get(name)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn record_duration(&self, name: &str, elapsed: Duration) {
        self.timers
            .write()
            .entry(name.to_string())
            .or_default()
            .record(elapsed);
    }

    pub fn timer(&self, name: &str) -> Option<TimerSnapshot> {
        self.timers.read().get(name).copied()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let names: Vec<String> = self.gauges.read().keys().cloned().collect();

        MetricsSnapshot {
            gauges: names
                .into_iter()
                .filter_map(|name| self.gauge_value(&name).map(|value| (name, value)))
                .collect(),
            counters: self
                .counters
                .read()
                .iter()
                .map(|(name, c)| (name.clone(), c.load(Ordering::Relaxed)))
                .collect(),
            timers: self.timers.read().clone(),
        }
    }
}

impl std::fmt::Debug for MetricRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricRegistry")
            .field("gauges", &self.gauges.read().keys().collect::<Vec<_>>())
            .field("counters", &self.counters.read().len())
            .field("timers", &self.timers.read().len())
            .finish()
    }
}
