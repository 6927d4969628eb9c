//! Offline language-pair provisioning, memoized per (from, to).
//!
//! The first `ensure_installed` call for a pair decides its outcome for the
//! lifetime of the cache. Concurrent callers for the same pair wait on the
//! same attempt, so the package manager sees at most one install per pair.

use crate::engine::PackageManager;
use crate::metrics::TranslationMetrics;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

type PairKey = (String, String);

pub struct CapabilityCache {
    manager: Arc<dyn PackageManager>,
    attempts: Mutex<HashMap<PairKey, Arc<OnceCell<bool>>>>,
    metrics: Arc<TranslationMetrics>,
}

impl CapabilityCache {
    pub fn new(manager: Arc<dyn PackageManager>, metrics: Arc<TranslationMetrics>) -> Self {
        Self {
            manager,
            attempts: Mutex::new(HashMap::new()),
            metrics,
        }
    }

    /// Make sure the offline engine can translate `from` -> `to`.
    ///
    /// Returns the cached outcome on every call after the first, including
    /// a cached `false`.
    pub async fn ensure_installed(&self, from: &str, to: &str) -> bool {
        let cell = self.cell_for(from, to);
        *cell.get_or_init(|| self.provision(from, to)).await
    }

    /// Outcome of an earlier attempt, if one has finished.
    pub fn cached(&self, from: &str, to: &str) -> Option<bool> {
        let key = (from.to_string(), to.to_string());
        self.lock().get(&key).and_then(|cell| cell.get().copied())
    }

    fn cell_for(&self, from: &str, to: &str) -> Arc<OnceCell<bool>> {
        self.lock()
            .entry((from.to_string(), to.to_string()))
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PairKey, Arc<OnceCell<bool>>>> {
        self.attempts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn provision(&self, from: &str, to: &str) -> bool {
        match self.manager.installed_pairs().await {
            Ok(pairs) if pairs.contains(&(from.to_string(), to.to_string())) => {
                debug!("Offline pair {}->{} already installed", from, to);
                return true;
            }
            Ok(_) => {}
            Err(e) => warn!("Could not list installed offline pairs: {}", e),
        }

        self.metrics.record_install_attempt();
        info!("Provisioning offline pair {}->{}", from, to);

        let installed = self.download_and_install(from, to).await;
        if !installed {
            self.metrics.record_install_failure();
        }
        installed
    }

    async fn download_and_install(&self, from: &str, to: &str) -> bool {
        if let Err(e) = self.manager.update_index().await {
            warn!("Offline package index refresh failed: {}", e);
            return false;
        }

        let packages = match self.manager.available_packages().await {
            Ok(packages) => packages,
            Err(e) => {
                warn!("Listing offline packages failed: {}", e);
                return false;
            }
        };

        let Some(package) = packages
            .iter()
            .find(|p| p.from_code == from && p.to_code == to)
        else {
            warn!("No offline package available for {}->{}", from, to);
            return false;
        };

        match self.manager.install(package).await {
            Ok(()) => {
                info!("Installed offline package {}", package.handle);
                true
            }
            Err(e) => {
                warn!("Installing {} failed: {}", package.handle, e);
                false
            }
        }
    }
}
