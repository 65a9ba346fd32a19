use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SEARCH_URL: &str =
    "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub search_url: String,
    /// YAML location table; the built-in table is used when unset.
    pub locations_path: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    /// Attempts per page for transient failures (network errors, non-429/404 statuses).
    pub max_attempts: u32,
    pub pacing_min_ms: u64,
    pub pacing_max_ms: u64,
    pub rate_limit_cooldown_secs: u64,
    /// 429 cooldowns allowed per page, counted separately from `max_attempts`.
    pub max_rate_limit_cooldowns: u32,
    /// Consecutive rounds without new listings before the source is treated as exhausted.
    pub max_empty_pages: u32,
    pub max_pages: u32,
}

impl AppConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn rate_limit_cooldown(&self) -> Duration {
        Duration::from_secs(self.rate_limit_cooldown_secs)
    }

    /// Inclusive pacing window applied before every request attempt.
    #[must_use]
    pub fn pacing_window(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.pacing_min_ms),
            Duration::from_millis(self.pacing_max_ms),
        )
    }
}
