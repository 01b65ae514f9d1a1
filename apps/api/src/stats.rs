//! Process-wide usage counters.
//!
//! Counters live for the process lifetime only — losing them on restart is
//! acceptable. The store is a trait so handlers are tested against isolated
//! instances instead of shared process state.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::Serialize;

/// Increment/read seam for usage counters.
pub trait StatsStore: Send + Sync {
    /// Records one successful generation, attributed to exactly one language
    /// key and one scenario key.
    fn record_generation(&self, language: &str, scenario: &str);

    /// Records that the user picked one of the suggestions.
    fn record_chosen(&self);

    fn snapshot(&self) -> StatsSnapshot;
}

/// Point-in-time view of the counters, shaped for GET /stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub total_generations: u64,
    pub by_language: BTreeMap<String, u64>,
    pub by_scenario: BTreeMap<String, u64>,
    pub conversion_rate_guess: f64,
}

#[derive(Debug, Default)]
struct Counters {
    total_generations: u64,
    by_language: BTreeMap<String, u64>,
    by_scenario: BTreeMap<String, u64>,
    chosen: u64,
}

/// In-memory `StatsStore` guarded by a mutex so concurrent requests produce
/// deterministic counts.
#[derive(Debug, Default)]
pub struct InMemoryStats {
    inner: Mutex<Counters>,
}

impl InMemoryStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Counters> {
        // A poisoned lock only means another request panicked mid-increment;
        // the counters themselves are still usable.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StatsStore for InMemoryStats {
    fn record_generation(&self, language: &str, scenario: &str) {
        let mut counters = self.lock();
        counters.total_generations += 1;
        *counters.by_language.entry(language.to_string()).or_insert(0) += 1;
        *counters.by_scenario.entry(scenario.to_string()).or_insert(0) += 1;
    }

    fn record_chosen(&self) {
        self.lock().chosen += 1;
    }

    fn snapshot(&self) -> StatsSnapshot {
        let counters = self.lock();
        // max(1, total) guards the division when nothing was generated yet.
        let rate = counters.chosen as f64 / counters.total_generations.max(1) as f64;

        StatsSnapshot {
            total_generations: counters.total_generations,
            by_language: counters.by_language.clone(),
            by_scenario: counters.by_scenario.clone(),
            conversion_rate_guess: (rate * 1000.0).round() / 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_store_reports_zero_rate_without_dividing_by_zero() {
        let stats = InMemoryStats::new();
        let snapshot = stats.snapshot();

        assert_eq!(snapshot.total_generations, 0);
        assert_eq!(snapshot.conversion_rate_guess, 0.0);
        assert!(snapshot.by_language.is_empty());
        assert!(snapshot.by_scenario.is_empty());
    }

    #[test]
    fn test_generation_increments_total_and_both_breakdowns() {
        let stats = InMemoryStats::new();
        stats.record_generation("it", "apologize");
        stats.record_generation("it", "flirt");
        stats.record_generation("en", "apologize");

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total_generations, 3);
        assert_eq!(snapshot.by_language["it"], 2);
        assert_eq!(snapshot.by_language["en"], 1);
        assert_eq!(snapshot.by_scenario["apologize"], 2);
        assert_eq!(snapshot.by_scenario["flirt"], 1);
    }

    #[test]
    fn test_breakdowns_sum_to_total() {
        let stats = InMemoryStats::new();
        for (language, scenario) in [("en", "thank"), ("ru", "thank"), ("en", "ask_out")] {
            stats.record_generation(language, scenario);
        }

        let snapshot = stats.snapshot();
        let by_language: u64 = snapshot.by_language.values().sum();
        let by_scenario: u64 = snapshot.by_scenario.values().sum();
        assert_eq!(by_language, snapshot.total_generations);
        assert_eq!(by_scenario, snapshot.total_generations);
    }

    #[test]
    fn test_conversion_rate_is_rounded_to_three_decimals() {
        let stats = InMemoryStats::new();
        for _ in 0..3 {
            stats.record_generation("en", "other");
        }
        stats.record_chosen();

        // 1/3 rounded to three decimals
        assert_eq!(stats.snapshot().conversion_rate_guess, 0.333);
    }

    #[test]
    fn test_snapshot_is_idempotent() {
        let stats = InMemoryStats::new();
        stats.record_generation("en", "other");
        stats.record_chosen();

        assert_eq!(stats.snapshot(), stats.snapshot());
    }
}
