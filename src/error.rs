use std::time::Duration;
use thiserror::Error;

/// Failure of a single call into a translation back end.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{engine} returned HTTP {status}: {body}")]
    Status {
        engine: &'static str,
        status: u16,
        body: String,
    },

    #[error("{engine} transport error: {message}")]
    Transport {
        engine: &'static str,
        message: String,
    },

    #[error("{engine} timed out after {after:?}")]
    Timeout {
        engine: &'static str,
        after: Duration,
    },

    #[error("language pair {from}->{to} is not installed")]
    LanguageNotInstalled { from: String, to: String },

    #[error("{engine} returned a malformed response: {detail}")]
    MalformedResponse {
        engine: &'static str,
        detail: String,
    },

    #[error("{engine} command failed: {detail}")]
    Process {
        engine: &'static str,
        detail: String,
    },
}

impl EngineError {
    /// Whether a retry could plausibly succeed (transport faults, 429, 5xx).
    pub fn is_transient(&self) -> bool {
        match self {
            EngineError::Transport { .. } | EngineError::Timeout { .. } => true,
            EngineError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Outcome of a translation request that did not produce a translation.
#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("One or both languages are not supported: {from}, {to}")]
    UnsupportedLanguage { from: String, to: String },

    #[error("Unsupported language combination for translation: {from} -> {to}")]
    UnsupportedPair { from: String, to: String },

    #[error("Required translation package could not be installed: {from} -> {to}")]
    ProvisioningFailed { from: String, to: String },

    #[error("Translation backend failure: {0}")]
    Backend(#[from] EngineError),

    #[error("Input list has {len} items, the limit is {max}")]
    InputTooLarge { len: usize, max: usize },

    #[error("Unsupported input type: {0}")]
    UnsupportedInputShape(String),
}

impl TranslationError {
    /// Stable machine-readable tag for this outcome.
    pub fn code(&self) -> &'static str {
        match self {
            TranslationError::UnsupportedLanguage { .. } => "unsupported_language",
            TranslationError::UnsupportedPair { .. } => "unsupported_pair",
            TranslationError::ProvisioningFailed { .. } => "provisioning_failed",
            TranslationError::Backend(_) => "translation_backend_failure",
            TranslationError::InputTooLarge { .. } => "input_too_large",
            TranslationError::UnsupportedInputShape(_) => "unsupported_input_shape",
        }
    }
}

/// Outcome of a recommendation request that did not produce a ranking.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Unrecognized catalog domain '{0}', expected one of job, course, scholarship, ondc")]
    UnrecognizedDomain(String),
}

impl CatalogError {
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::UnrecognizedDomain(_) => "unrecognized_domain",
        }
    }
}
