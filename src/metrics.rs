//! Translation counters.
//!
//! One `TranslationMetrics` is shared (via `Arc`) between the translation
//! caches, the capability cache and the HTTP layer that reports it. Nothing
//! here is process-global, so separate orchestrators count separately.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct TranslationMetrics {
    /// Translations answered from an LRU cache
    cache_hits: AtomicUsize,

    /// Translations that had to reach an engine
    cache_misses: AtomicUsize,

    /// Calls made to either engine
    engine_calls: AtomicUsize,

    /// Engine calls that returned an error
    engine_failures: AtomicUsize,

    /// Offline package installs actually attempted (not memoized)
    install_attempts: AtomicUsize,

    /// Attempted installs that did not leave the pair usable
    install_failures: AtomicUsize,
}

impl TranslationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_engine_call(&self) {
        self.engine_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_engine_failure(&self) {
        self.engine_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_install_attempt(&self) {
        self.install_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_install_failure(&self) {
        self.install_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn engine_calls(&self) -> usize {
        self.engine_calls.load(Ordering::Relaxed)
    }

    pub fn install_attempts(&self) -> usize {
        self.install_attempts.load(Ordering::Relaxed)
    }

    /// Snapshot the counters with derived rates.
    pub fn report(&self) -> MetricsReport {
        let hits = self.cache_hits.load(Ordering::Relaxed);
        let misses = self.cache_misses.load(Ordering::Relaxed);
        let calls = self.engine_calls();
        let failures = self.engine_failures.load(Ordering::Relaxed);

        MetricsReport {
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_rate: percentage(hits, hits + misses),
            engine_calls: calls,
            engine_failures: failures,
            engine_success_rate: percentage(calls.saturating_sub(failures), calls),
            install_attempts: self.install_attempts(),
            install_failures: self.install_failures.load(Ordering::Relaxed),
        }
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Point-in-time view of `TranslationMetrics`.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub cache_hits: usize,
    pub cache_misses: usize,

    /// Percentage (0-100)
    pub cache_hit_rate: f64,

    pub engine_calls: usize,
    pub engine_failures: usize,

    /// Percentage (0-100)
    pub engine_success_rate: f64,

    pub install_attempts: usize,
    pub install_failures: usize,
}
