//! Scoped instrumentation for request entry points.
//!
//! Open a `Scope` when an operation starts and `finish` it with the result;
//! one structured log line records start and end timestamps, elapsed time
//! and the outcome tag.

use crate::error::{CatalogError, TranslationError};
use chrono::{DateTime, SecondsFormat, Utc};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Errors that can be reported as a short outcome tag.
pub trait OutcomeTag {
    fn outcome_tag(&self) -> &'static str;
}

impl OutcomeTag for TranslationError {
    fn outcome_tag(&self) -> &'static str {
        self.code()
    }
}

impl OutcomeTag for CatalogError {
    fn outcome_tag(&self) -> &'static str {
        self.code()
    }
}

#[derive(Debug)]
pub struct Scope {
    operation: &'static str,
    started_at: DateTime<Utc>,
    clock: Instant,
}

/// What a finished scope logged.
#[derive(Debug, Clone)]
pub struct ScopeReport {
    pub operation: &'static str,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_ms: u128,
    pub outcome: &'static str,
}

impl Scope {
    pub fn start(operation: &'static str) -> Self {
        let started_at = Utc::now();
        debug!(
            operation,
            started_at = %started_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            "operation started"
        );
        Self {
            operation,
            started_at,
            clock: Instant::now(),
        }
    }

    pub fn finish<T, E: OutcomeTag>(self, result: &Result<T, E>) -> ScopeReport {
        let outcome = match result {
            Ok(_) => "ok",
            Err(e) => e.outcome_tag(),
        };
        let report = ScopeReport {
            operation: self.operation,
            started_at: self.started_at,
            finished_at: Utc::now(),
            elapsed_ms: self.clock.elapsed().as_millis(),
            outcome,
        };

        let started = report
            .started_at
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        let finished = report
            .finished_at
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        if result.is_ok() {
            info!(
                operation = report.operation,
                started_at = %started,
                finished_at = %finished,
                elapsed_ms = report.elapsed_ms as u64,
                outcome = report.outcome,
                "operation finished"
            );
        } else {
            warn!(
                operation = report.operation,
                started_at = %started,
                finished_at = %finished,
                elapsed_ms = report.elapsed_ms as u64,
                outcome = report.outcome,
                "operation failed"
            );
        }
        report
    }
}
