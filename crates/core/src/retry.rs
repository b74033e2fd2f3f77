//! Retry policy for content transfer

use std::time::Duration;

/// Upper bound for backoff growth; a larger base delay is kept as is
pub const MAX_DELAY: Duration = Duration::from_secs(60);

/// Statuses meaning the upload target accepted the file
const SUCCESS_STATUSES: [u16; 2] = [201, 202];

/// How many times to attempt the content transfer and how long to wait in
/// between.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts; 0 is treated as 1
    pub max_retries: u32,
    /// Wait after the first failure
    pub delay: Duration,
    /// Growth factor per failure; 1.0 keeps the wait fixed
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_secs(2),
            backoff_multiplier: 1.0,
        }
    }
}

impl RetryPolicy {
    /// Default policy with a custom attempt limit
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Number of attempts the loop may make
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Wait after the `failures`-th failed attempt (1-based).
    ///
    /// Growth stops at [`MAX_DELAY`], but never below the base delay.
    pub fn delay_for(&self, failures: u32) -> Duration {
        let exponent = failures.saturating_sub(1).min(i32::MAX as u32) as i32;
        let factor = self.backoff_multiplier.max(1.0).powi(exponent);
        let cap = MAX_DELAY.max(self.delay);
        let millis = (self.delay.as_millis() as f64 * factor).min(cap.as_millis() as f64);
        Duration::from_millis(millis as u64)
    }
}

/// 201 Created or 202 Accepted
pub fn is_success(status: u16) -> bool {
    SUCCESS_STATUSES.contains(&status)
}
