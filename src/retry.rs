use crate::FailureKind;
use std::time::Duration;

/// Configuration for how the search loop waits between attempts.
///
/// The default waits 5 seconds after a failed directory lookup and 2 seconds
/// after any other failed attempt, with no backoff and no attempt cap: the
/// loop keeps going until it finds a match or is cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay after the random band lookup fails
    pub fetch_failure_delay: Duration,
    /// Delay after a search, extraction or classification miss
    pub retry_delay: Duration,
    /// Growth factor per consecutive failure (1 = fixed delays)
    pub backoff_multiplier: u32,
    /// Upper bound for a single delay once backoff applies
    pub max_delay: Duration,
    /// Stop after this many attempts (`None` = unbounded)
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            fetch_failure_delay: Duration::from_secs(5),
            retry_delay: Duration::from_secs(2),
            backoff_multiplier: 1,
            max_delay: Duration::from_secs(300), // 5 minutes
            max_attempts: None,
        }
    }
}

impl RetryPolicy {
    /// A policy with no delays, for tests and scripted runs.
    pub fn immediate() -> Self {
        Self {
            fetch_failure_delay: Duration::ZERO,
            retry_delay: Duration::ZERO,
            ..Default::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_delays(mut self, fetch_failure_delay: Duration, retry_delay: Duration) -> Self {
        self.fetch_failure_delay = fetch_failure_delay;
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_backoff(mut self, multiplier: u32, max_delay: Duration) -> Self {
        self.backoff_multiplier = multiplier.max(1);
        self.max_delay = max_delay;
        self
    }

    /// Delay before the next attempt after the `consecutive_failures`-th
    /// failure in a row (1-based) of the given kind.
    pub fn delay_for(&self, kind: FailureKind, consecutive_failures: u32) -> Duration {
        let base = match kind {
            FailureKind::Fetch => self.fetch_failure_delay,
            FailureKind::Search | FailureKind::Extraction | FailureKind::NotMetal => {
                self.retry_delay
            }
        };

        if self.backoff_multiplier <= 1 {
            return base;
        }

        let exponent = consecutive_failures.saturating_sub(1);
        let factor = self.backoff_multiplier.saturating_pow(exponent);
        std::cmp::min(base.saturating_mul(factor), self.max_delay.max(base))
    }

    /// Whether the loop should stop after `attempts` attempts.
    pub fn is_exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }
}
