use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Bounded exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Wait before the second attempt
    pub initial_delay: Duration,
    /// Upper bound for any single wait
    pub max_delay: Duration,
    /// Growth factor between consecutive waits
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Cloud pipeline calls: 3 attempts, waits of 500ms then 1s.
    pub fn cloud_pipeline() -> Self {
        Self::new(3, Duration::from_millis(500)).with_max_delay(Duration::from_secs(4))
    }

    /// Single attempt, for callers that must not retry.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Wait before `attempt` (0-indexed); always zero for the first attempt.
    fn delay_before(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = self.backoff_multiplier.powi(attempt as i32 - 1);
        let millis = self.initial_delay.as_millis() as f64 * factor;
        Duration::from_millis(millis as u64).min(self.max_delay)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::cloud_pipeline()
    }
}

/// Run `operation` until it succeeds, `should_retry` rejects the error, or
/// the attempts run out. Returns the last error in the latter two cases.
pub async fn with_retry_if<T, E, F, Fut, P>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        let delay = config.delay_before(attempt);
        if !delay.is_zero() {
            debug!(
                "{}: waiting {:?} before attempt {}/{}",
                operation_name,
                delay,
                attempt + 1,
                attempts
            );
            sleep(delay).await;
        }

        let error = match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        attempt += 1;
        if !should_retry(&error) {
            debug!("{}: not retrying: {}", operation_name, error);
            return Err(error);
        }
        if attempt >= attempts {
            warn!(
                "{}: giving up after {} attempts: {}",
                operation_name, attempts, error
            );
            return Err(error);
        }
        warn!(
            "{}: attempt {}/{} failed ({}), retrying",
            operation_name, attempt, attempts, error
        );
    }
}
