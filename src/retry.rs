//! A single configurable retry primitive for every retrying call site.
//!
//! The crawl retries in three places with different budgets and delays:
//! listing retrieval, next-page probing, and article extraction. Rather than
//! three inline loops, each call site parameterizes one [`RetryPolicy`].
//!
//! # Backoff
//!
//! Fixed delay or exponential doubling with a cap, plus 0-250ms of random
//! jitter on every wait:
//!
//! ```text
//! delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
//! ```

use rand::{Rng, rng};
use std::error::Error;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, warn};

/// How the delay grows between attempts.
#[derive(Debug, Clone, Copy)]
pub enum Backoff {
    /// Same delay before every retry.
    Fixed,
    /// Delay doubles each retry, capped at `max_delay`.
    Exponential { max_delay: Duration },
}

/// A retry budget: how many retries, how long to wait, how the wait grows.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_retries: usize,
    base_delay: Duration,
    backoff: Backoff,
}

impl RetryPolicy {
    /// A policy that waits the same `delay` before each of up to
    /// `max_retries` retries (so `max_retries + 1` attempts in total).
    pub fn fixed(max_retries: usize, delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay: delay,
            backoff: Backoff::Fixed,
        }
    }

    /// A policy whose delay doubles from `base_delay` up to `max_delay`.
    pub fn exponential(max_retries: usize, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            backoff: Backoff::Exponential { max_delay },
        }
    }

    fn delay_for(&self, attempt: usize) -> Duration {
        let mut delay = match self.backoff {
            Backoff::Fixed => self.base_delay,
            Backoff::Exponential { max_delay } => {
                let scaled = self.base_delay.saturating_mul(1 << (attempt - 1).min(31));
                scaled.min(max_delay)
            }
        };
        let jitter_ms: u64 = rng().random_range(0..=250);
        delay += Duration::from_millis(jitter_ms);
        delay
    }

    /// Run `op` until it succeeds or the retry budget is spent.
    ///
    /// `what` names the operation in log lines. The final error is returned
    /// unchanged so callers can still recognize its concrete type.
    pub async fn run<T>(
        &self,
        what: &str,
        mut op: impl AsyncFnMut() -> Result<T, Box<dyn Error>>,
    ) -> Result<T, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            what,
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                            elapsed_ms_total = total_dt.as_millis() as u128,
                            error = %e,
                            "retry budget exhausted"
                        );
                        return Err(e);
                    }

                    let delay = self.delay_for(attempt);
                    warn!(
                        what,
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                        elapsed_ms_total = total_dt.as_millis() as u128,
                        ?delay,
                        error = %e,
                        "attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}
