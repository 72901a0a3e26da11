//! Bounded retry for transient infrastructure failures.

use std::time::Duration;

use tracing::warn;

/// Typed transient/permanent classification.
///
/// Implemented where the underlying I/O call fails, so retry decisions never
/// depend on matching error message text.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

/// Fixed-delay retry with a bounded attempt count.
///
/// The default matches the engine contract: 3 total attempts, 1 second apart.
/// Permanent errors surface immediately; transient errors surface after the
/// attempt budget is exhausted.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first (0 is treated as 1).
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Invoke `op`, re-invoking on transient failures up to the attempt budget.
    pub fn run<T, E>(&self, mut op: impl FnMut() -> Result<T, E>) -> Result<T, E>
    where
        E: Transient + core::fmt::Display,
    {
        let budget = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < budget => {
                    warn!(attempt, error = %e, "transient failure, retrying");
                    std::thread::sleep(self.delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
