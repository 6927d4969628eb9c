//! Language universes, alias resolution and strategy selection.
//!
//! - `registry`: alias tables for the offline engine and the cloud pipeline
//! - `selector`: maps a resolved code pair to a translation strategy
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::language::{select, LanguageRegistry};
//!
//! let registry = LanguageRegistry::get();
//! let from = registry.resolve("German").unwrap();
//! let to = registry.resolve("HINDI").unwrap();
//! let strategy = select(registry, from, to); // bridge through "en"
//! ```

mod registry;
mod selector;

pub use registry::{LanguageAlias, LanguageRegistry, Universe, PIVOT_CODE};
pub use selector::{select, Strategy};
