//! Fixed-delay retry for scheduled jobs.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// How many times a failed job attempt is repeated, and how long to wait
/// between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    /// Single attempt.
    pub const NONE: RetryPolicy = RetryPolicy {
        max_retries: 0,
        delay: Duration::ZERO,
    };

    /// Direct report generation: five retries, one minute apart.
    pub const REPORT_GENERATION: RetryPolicy = RetryPolicy {
        max_retries: 5,
        delay: Duration::from_secs(60),
    };

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Run `op` until it succeeds or the retries are used up. The last
    /// error is returned.
    pub async fn run<T, E, F, Fut>(&self, job: &str, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) if attempt < self.max_attempts() => {
                    warn!(
                        job,
                        attempt,
                        max_attempts = self.max_attempts(),
                        error = %e,
                        "Job attempt failed, retrying"
                    );
                    attempt += 1;
                    tokio::time::sleep(self.delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
