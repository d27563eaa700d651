use async_trait::async_trait;
use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Fraction of the base delay added or removed at random between retries.
pub const DEFAULT_JITTER: f64 = 0.5;

/// Fixed-delay retry policy with random jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (total runs = 1 + max_retries).
    pub max_retries: u32,
    pub base_delay: Duration,
    /// Delay is scaled by a random factor in `[1 - jitter, 1 + jitter]`.
    pub jitter: f64,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            jitter: DEFAULT_JITTER,
        }
    }

    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }

    /// Delay before the next attempt, drawn from `rng`.
    pub fn next_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.jitter <= 0.0 || self.base_delay.is_zero() {
            return self.base_delay;
        }
        let factor = rng.gen_range(-self.jitter..=self.jitter);
        Duration::try_from_secs_f64(self.base_delay.as_secs_f64() * (1.0 + factor))
            .unwrap_or(Duration::MAX)
    }
}

/// Suspends the current task between retry attempts.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Outcome of a failed attempt.
#[derive(Debug)]
pub enum Failure<E> {
    /// Worth another attempt: connection errors, timeouts, non-2xx replies.
    Transient(E),
    /// Retrying cannot help.
    Permanent(E),
}

/// Retries an async operation according to `policy`
///
/// # Parameters
/// - `operation`: Closure returning a future
/// - `policy`: Number of retries and the delay between them
/// - `delay`: Performs the wait between attempts
///
/// # Returns
/// Either the successful result or the last error
pub async fn with_retry<F, Fut, T, E>(
    mut operation: F,
    policy: &RetryPolicy,
    delay: &dyn Delay,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Failure<E>>>,
    E: Display,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(Failure::Permanent(err)) => return Err(err),
            Err(Failure::Transient(err)) => {
                if attempt > policy.max_retries {
                    return Err(err);
                }
                let wait = policy.next_delay(&mut rand::thread_rng());
                debug!(
                    "Attempt {}/{} failed: {}. Retrying in {:?}...",
                    attempt, policy.max_retries, err, wait
                );
                attempt += 1;
                delay.sleep(wait).await;
            }
        }
    }
}
