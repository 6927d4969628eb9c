//! Translation back ends.
//!
//! The orchestrator only talks to these traits. Concrete adapters:
//! - `offline`: Argos Translate command-line tools (`argospm`, `argos-translate`)
//! - `cloud`: two-phase pipeline HTTP API
//!
//! `cache` wraps any engine with a bounded LRU keyed by (text, from, to).

pub mod cache;
pub mod cloud;
pub mod offline;

use crate::error::EngineError;
use async_trait::async_trait;
use std::collections::HashSet;

/// Anything that can translate one unit of text between two codes.
#[async_trait]
pub trait TranslationEngine: Send + Sync {
    /// Short name for logs and errors (e.g., "offline", "cloud").
    fn name(&self) -> &'static str;

    async fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, EngineError>;
}

/// A package the offline engine could download and install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailablePackage {
    pub from_code: String,
    pub to_code: String,
    /// Opaque handle passed back to `install` (package name for Argos).
    pub handle: String,
}

/// Package management side of the offline engine.
#[async_trait]
pub trait PackageManager: Send + Sync {
    async fn installed_pairs(&self) -> Result<HashSet<(String, String)>, EngineError>;

    async fn update_index(&self) -> Result<(), EngineError>;

    async fn available_packages(&self) -> Result<Vec<AvailablePackage>, EngineError>;

    async fn install(&self, package: &AvailablePackage) -> Result<(), EngineError>;
}
