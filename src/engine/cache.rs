//! Memoized translation results.
//!
//! Each engine gets its own `CachedEngine`, so a bridged request populates
//! the offline and cloud caches independently, one entry per leg.

use crate::engine::TranslationEngine;
use crate::error::EngineError;
use crate::metrics::TranslationMetrics;
use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Default entries kept per engine.
pub const DEFAULT_CAPACITY: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    from: String,
    to: String,
}

/// Bounded LRU of translated text keyed by (text, from, to).
///
/// The lock is held only for the lookup or insert itself, never across an
/// engine call, so eviction can't race a concurrent read.
pub struct TranslationCache {
    entries: Mutex<LruCache<CacheKey, String>>,
}

impl TranslationCache {
    /// A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, text: &str, from: &str, to: &str) -> Option<String> {
        let key = CacheKey {
            text: text.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        };
        self.lock().get(&key).cloned()
    }

    pub fn put(&self, text: &str, from: &str, to: &str, translated: String) {
        let key = CacheKey {
            text: text.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        };
        self.lock().put(key, translated);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<CacheKey, String>> {
        // A poisoned cache only means another request panicked mid-insert;
        // the LRU itself is still consistent.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// An engine whose successful results are memoized.
///
/// Failures are never cached.
pub struct CachedEngine {
    inner: Arc<dyn TranslationEngine>,
    cache: TranslationCache,
    metrics: Arc<TranslationMetrics>,
}

impl CachedEngine {
    pub fn new(
        inner: Arc<dyn TranslationEngine>,
        capacity: usize,
        metrics: Arc<TranslationMetrics>,
    ) -> Self {
        Self {
            inner,
            cache: TranslationCache::new(capacity),
            metrics,
        }
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }
}

#[async_trait]
impl TranslationEngine for CachedEngine {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, EngineError> {
        if let Some(hit) = self.cache.get(text, from, to) {
            self.metrics.record_cache_hit();
            debug!("{}: cache hit for {}->{}", self.name(), from, to);
            return Ok(hit);
        }
        self.metrics.record_cache_miss();
        self.metrics.record_engine_call();

        match self.inner.translate(text, from, to).await {
            Ok(translated) => {
                self.cache.put(text, from, to, translated.clone());
                Ok(translated)
            }
            Err(e) => {
                self.metrics.record_engine_failure();
                warn!("{}: translation {}->{} failed: {}", self.name(), from, to, e);
                Err(e)
            }
        }
    }
}
