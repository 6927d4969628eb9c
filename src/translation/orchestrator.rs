//! Request-level translation: resolve, select, provision, plan, apply.

use crate::engine::cache::CachedEngine;
use crate::engine::{PackageManager, TranslationEngine};
use crate::error::TranslationError;
use crate::language::{select, LanguageRegistry};
use crate::metrics::TranslationMetrics;
use crate::telemetry::Scope;
use crate::translation::capability::CapabilityCache;
use crate::translation::payload::{
    normalize_field, ListItem, TranslationInput, TranslationOutput, UNSUPPORTED_ELEMENT,
};
use crate::translation::pipeline::{EngineSet, TranslationPlan};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Owns everything a translation request touches: the registry, one cached
/// engine per universe, the offline capability cache and the counters.
pub struct Orchestrator {
    registry: &'static LanguageRegistry,
    offline: Arc<CachedEngine>,
    cloud: Arc<CachedEngine>,
    capabilities: Arc<CapabilityCache>,
    metrics: Arc<TranslationMetrics>,
}

impl Orchestrator {
    /// Fresh caches over the process-wide language registry.
    pub fn new(
        offline: Arc<dyn TranslationEngine>,
        packages: Arc<dyn PackageManager>,
        cloud: Arc<dyn TranslationEngine>,
        cache_capacity: usize,
    ) -> Self {
        let metrics = Arc::new(TranslationMetrics::new());
        Self::with_parts(
            LanguageRegistry::get(),
            Arc::new(CachedEngine::new(offline, cache_capacity, metrics.clone())),
            Arc::new(CachedEngine::new(cloud, cache_capacity, metrics.clone())),
            Arc::new(CapabilityCache::new(packages, metrics.clone())),
            metrics,
        )
    }

    /// Build from caller-owned parts. Orchestrators handed the same `Arc`s
    /// share translation results and install outcomes; separate ones are
    /// isolated. Counters are recorded wherever each part was built to.
    pub fn with_parts(
        registry: &'static LanguageRegistry,
        offline: Arc<CachedEngine>,
        cloud: Arc<CachedEngine>,
        capabilities: Arc<CapabilityCache>,
        metrics: Arc<TranslationMetrics>,
    ) -> Self {
        Self {
            registry,
            offline,
            cloud,
            capabilities,
            metrics,
        }
    }

    pub fn metrics(&self) -> &Arc<TranslationMetrics> {
        &self.metrics
    }

    pub fn capabilities(&self) -> &CapabilityCache {
        &self.capabilities
    }

    /// Translate `text` from one language identifier to another.
    ///
    /// Identifiers may be codes or display names in any case. Keys listed in
    /// `excluded` are normalized but left untranslated in object inputs.
    pub async fn translate(
        &self,
        text: Value,
        from: &str,
        to: &str,
        excluded: &[String],
    ) -> Result<TranslationOutput, TranslationError> {
        let scope = Scope::start("translate");
        let result = self.resolve_and_translate(text, from, to, excluded).await;
        scope.finish(&result);
        result
    }

    async fn resolve_and_translate(
        &self,
        text: Value,
        from: &str,
        to: &str,
        excluded: &[String],
    ) -> Result<TranslationOutput, TranslationError> {
        let (Some(from_code), Some(to_code)) =
            (self.registry.resolve(from), self.registry.resolve(to))
        else {
            return Err(TranslationError::UnsupportedLanguage {
                from: from.to_string(),
                to: to.to_string(),
            });
        };
        debug!("Resolved {} -> {} as {} -> {}", from, to, from_code, to_code);

        self.translate_with_codes(text, from_code, to_code, excluded)
            .await
    }

    /// Translate between already-resolved codes, skipping registry lookup.
    pub async fn translate_with_codes(
        &self,
        text: Value,
        from_code: &str,
        to_code: &str,
        excluded: &[String],
    ) -> Result<TranslationOutput, TranslationError> {
        let strategy = select(self.registry, from_code, to_code);
        let plan = TranslationPlan::for_strategy(&strategy, from_code, to_code).ok_or_else(|| {
            TranslationError::UnsupportedPair {
                from: from_code.to_string(),
                to: to_code.to_string(),
            }
        })?;
        info!("Translating {} -> {} via {:?}", from_code, to_code, strategy);

        let input = TranslationInput::try_from(text)?;
        if !input.needs_engine() {
            return self.apply(&plan, input, excluded).await;
        }

        for (from, to) in plan.offline_pairs() {
            if !self.capabilities.ensure_installed(from, to).await {
                return Err(TranslationError::ProvisioningFailed {
                    from: from.to_string(),
                    to: to.to_string(),
                });
            }
        }

        self.apply(&plan, input, excluded).await
    }

    async fn apply(
        &self,
        plan: &TranslationPlan,
        input: TranslationInput,
        excluded: &[String],
    ) -> Result<TranslationOutput, TranslationError> {
        match input {
            TranslationInput::Text(text) => {
                Ok(TranslationOutput::Text(self.translate_text(plan, &text).await?))
            }
            TranslationInput::Object(fields) => Ok(TranslationOutput::Object(
                self.translate_object(plan, fields, excluded).await?,
            )),
            TranslationInput::List(items) => {
                let mut results = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    let result = match item {
                        ListItem::Text(text) => {
                            TranslationOutput::Text(self.translate_text(plan, &text).await?)
                        }
                        ListItem::Object(fields) => TranslationOutput::Object(
                            self.translate_object(plan, fields, excluded).await?,
                        ),
                        ListItem::Unsupported(kind) => {
                            warn!("List element {} is {}, left untranslated", index, kind);
                            TranslationOutput::Text(UNSUPPORTED_ELEMENT.to_string())
                        }
                    };
                    results.push(result);
                }
                Ok(TranslationOutput::List(results))
            }
        }
    }

    async fn translate_text(
        &self,
        plan: &TranslationPlan,
        text: &str,
    ) -> Result<String, TranslationError> {
        Ok(plan.run(&text.to_lowercase(), &self.engines()).await?)
    }

    async fn translate_object(
        &self,
        plan: &TranslationPlan,
        fields: Map<String, Value>,
        excluded: &[String],
    ) -> Result<Map<String, Value>, TranslationError> {
        let engines = self.engines();
        let mut translated = Map::with_capacity(fields.len());
        for (key, value) in fields {
            let normalized = normalize_field(&value);
            let output = if excluded.contains(&key) {
                normalized
            } else {
                plan.run(&normalized, &engines).await?
            };
            translated.insert(key, Value::String(output));
        }
        Ok(translated)
    }

    fn engines(&self) -> EngineSet<'_> {
        EngineSet {
            offline: self.offline.as_ref(),
            cloud: self.cloud.as_ref(),
        }
    }
}
