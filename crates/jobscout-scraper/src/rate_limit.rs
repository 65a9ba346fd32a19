//! Pacing, rate-limit cooldowns and retries for search page requests.
//!
//! Every attempt is preceded by a randomized pacing sleep so that request
//! timing has no fixed period. Failures are classified per attempt:
//!
//! | Attempt result | Action |
//! |----------------|--------|
//! | 2xx | return the body |
//! | 404 | give up immediately, [`Absence::NotFound`] |
//! | 429 | sleep the cooldown, retry; counted against `max_rate_limit_cooldowns` |
//! | other status / network error | retry; counted against `max_attempts` |
//!
//! Running out of either budget yields an [`Absence`], never an error.

use std::future::Future;
use std::time::Duration;

use jobscout_core::AppConfig;
use rand::Rng;
use serde::Serialize;

use crate::error::AttemptError;

/// Retry and pacing parameters for one page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts allowed for transient failures (network errors, non-429/404 statuses).
    pub max_attempts: u32,
    pub pacing_min: Duration,
    pub pacing_max: Duration,
    pub rate_limit_cooldown: Duration,
    /// 429 cooldowns allowed before giving up; these do not use up `max_attempts`.
    pub max_rate_limit_cooldowns: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            pacing_min: Duration::from_secs(2),
            pacing_max: Duration::from_secs(5),
            rate_limit_cooldown: Duration::from_secs(10),
            max_rate_limit_cooldowns: 3,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        let (pacing_min, pacing_max) = config.pacing_window();
        Self {
            max_attempts: config.max_attempts,
            pacing_min,
            pacing_max,
            rate_limit_cooldown: config.rate_limit_cooldown(),
            max_rate_limit_cooldowns: config.max_rate_limit_cooldowns,
        }
    }

    /// Draws a pacing delay uniformly from `[pacing_min, pacing_max]`.
    ///
    /// A reversed window is treated as if its bounds were swapped.
    #[must_use]
    pub fn pacing_delay(&self) -> Duration {
        let lo = self.pacing_min.min(self.pacing_max);
        let hi = self.pacing_min.max(self.pacing_max);
        if lo == hi {
            return lo;
        }
        let secs = rand::rng().random_range(lo.as_secs_f64()..=hi.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

/// Why a page fetch produced no body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Absence {
    /// HTTP 404; no retry was attempted.
    NotFound,
    /// Every transient-failure attempt was used up.
    RetriesExhausted,
    /// Every 429 cooldown was used up.
    RateLimited,
}

/// Result of fetching a single page through the retry loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Body(String),
    Absent(Absence),
}

impl FetchOutcome {
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            FetchOutcome::Body(body) => Some(body),
            FetchOutcome::Absent(_) => None,
        }
    }
}

/// Runs `operation` under `policy`, pacing every attempt.
///
/// `url` is only used for logging.
pub(crate) async fn fetch_with_retries<F, Fut>(
    policy: &RetryPolicy,
    url: &str,
    mut operation: F,
) -> FetchOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String, AttemptError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0u32;
    let mut cooldowns = 0u32;

    while attempt < max_attempts {
        let delay = policy.pacing_delay();
        tracing::debug!(delay_ms = delay.as_millis(), "pacing before request");
        tokio::time::sleep(delay).await;

        tracing::info!(
            url,
            attempt = attempt + 1,
            max_attempts,
            "fetching search page"
        );

        match operation().await {
            Ok(body) => return FetchOutcome::Body(body),
            Err(AttemptError::NotFound { .. }) => {
                tracing::warn!(url, "search page not found (404); not retrying");
                return FetchOutcome::Absent(Absence::NotFound);
            }
            Err(AttemptError::RateLimited { .. }) => {
                cooldowns += 1;
                if cooldowns > policy.max_rate_limit_cooldowns {
                    tracing::error!(
                        url,
                        cooldowns = cooldowns - 1,
                        "still rate limited after all cooldowns; giving up on page"
                    );
                    return FetchOutcome::Absent(Absence::RateLimited);
                }
                tracing::warn!(
                    url,
                    cooldown_secs = policy.rate_limit_cooldown.as_secs_f64(),
                    cooldown = cooldowns,
                    max_cooldowns = policy.max_rate_limit_cooldowns,
                    "rate limit hit (429); cooling down"
                );
                tokio::time::sleep(policy.rate_limit_cooldown).await;
            }
            Err(err) => {
                attempt += 1;
                tracing::error!(
                    url,
                    attempt,
                    max_attempts,
                    error = %err,
                    "search page request failed"
                );
            }
        }
    }

    tracing::error!(url, max_attempts, "failed to fetch search page after all attempts");
    FetchOutcome::Absent(Absence::RetriesExhausted)
}
