use std::time::Duration;

use rand::Rng;

/// Specifies the backoff strategy applied between upstream attempts.
#[derive(Clone, Debug)]
pub enum Backoff {
    /// Uses a fixed delay between retries.
    Fixed(Duration),
    /// Uses an exponential delay between retries.
    /// The pre-jitter delay is `base * (factor ^ attempt)`, capped at `max`.
    Exponential {
        /// The initial backoff duration.
        base: Duration,
        /// The multiplicative factor for each subsequent retry.
        factor: f64,
        /// The maximum duration to wait between retries.
        max: Duration,
        /// Upper bound of the uniform random component added to each delay.
        jitter: Duration,
    },
}

impl Backoff {
    /// The delay before the retry following the given attempt (0-based),
    /// before jitter is applied.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match self {
            Self::Fixed(d) => *d,
            Self::Exponential {
                base, factor, max, ..
            } => {
                // powi can reach infinity for large exponents; capping in
                // f64 space keeps the Duration conversion in range.
                let scale = factor.powi(attempt.min(32) as i32);
                let secs = (base.as_secs_f64() * scale).min(max.as_secs_f64()).max(0.0);
                Duration::from_secs_f64(secs)
            }
        }
    }

    /// [`delay_for`](Self::delay_for) plus a uniform random component in
    /// `[0, jitter]`.
    pub(crate) fn jittered(&self, attempt: u32) -> Duration {
        let delay = self.delay_for(attempt);
        match self {
            Self::Exponential { jitter, .. } if !jitter.is_zero() => {
                delay + rand::rng().random_range(Duration::ZERO..=*jitter)
            }
            _ => delay,
        }
    }
}

/// Configuration for the upstream retry loop.
#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Maximum number of upstream attempts for a single fetch call.
    pub max_retries: u32,
    /// The backoff strategy to use between attempts.
    pub backoff: Backoff,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff: Backoff::Exponential {
                base: Duration::from_secs(1),
                factor: 2.0,
                max: Duration::from_secs(30),
                jitter: Duration::from_secs(1),
            },
        }
    }
}
