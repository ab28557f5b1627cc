//! Rate-limit backoff around a single upstream operation.

use std::future::Future;
use std::num::NonZeroU32;
use std::time::Duration;

use super::error::Result;

/// Told about every cooldown before the policy sleeps.
pub trait CooldownNotice {
    fn cooling_down(&self, attempt: u32, cooldown: Duration);
}

/// How many times an operation may be attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryLimit {
    /// Keep retrying; rate limits are time-boxed and eventually clear.
    Unbounded,
    /// Give up after this many attempts and return the last error.
    Attempts(NonZeroU32),
}

/// Fixed-cooldown retry policy for rate-limit errors.
///
/// Any other error is returned immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    cooldown: Duration,
    limit: RetryLimit,
}

impl RetryPolicy {
    pub fn new(cooldown: Duration, limit: RetryLimit) -> Self {
        Self { cooldown, limit }
    }

    pub fn unbounded(cooldown: Duration) -> Self {
        Self::new(cooldown, RetryLimit::Unbounded)
    }

    fn may_retry_after(&self, attempt: u32) -> bool {
        match self.limit {
            RetryLimit::Unbounded => true,
            RetryLimit::Attempts(max) => attempt < max.get(),
        }
    }

    /// Run `operation`, sleeping for the cooldown and trying again whenever
    /// it fails with a rate-limit error. `notice` hears about each sleep.
    pub async fn run<T, F, Fut>(&self, notice: &dyn CooldownNotice, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Err(e) if e.is_rate_limited() && self.may_retry_after(attempt) => {
                    tracing::warn!(
                        attempt,
                        cooldown_secs = self.cooldown.as_secs(),
                        error = %e,
                        "rate limit hit, sleeping before retry"
                    );
                    notice.cooling_down(attempt, self.cooldown);
                    tokio::time::sleep(self.cooldown).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}
