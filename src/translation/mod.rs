//! Translation routing across the offline and cloud engines.
//!
//! - `capability`: memoized offline package provisioning
//! - `pipeline`: ordered engine legs for one unit of text
//! - `payload`: string / object / list input shapes
//! - `orchestrator`: ties the above together per request

pub mod capability;
pub mod orchestrator;
pub mod payload;
pub mod pipeline;

pub use capability::CapabilityCache;
pub use orchestrator::Orchestrator;
pub use payload::{
    ListItem, TranslationInput, TranslationOutput, MAX_LIST_ITEMS, UNSUPPORTED_ELEMENT,
};
pub use pipeline::{EngineSet, Leg, TranslationPlan};
