use crate::app_config::{
    AppConfig, DEFAULT_ACCEPT, DEFAULT_ACCEPT_LANGUAGE, DEFAULT_SEARCH_URL, DEFAULT_USER_AGENT,
};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; the lookup is injected so tests can use a plain
/// `HashMap` instead of mutating the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let log_level = or_default("JOBSCOUT_LOG_LEVEL", "info");
    let search_url = or_default("JOBSCOUT_SEARCH_URL", DEFAULT_SEARCH_URL);
    let locations_path = lookup("JOBSCOUT_LOCATIONS_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let request_timeout_secs = parse_u64("JOBSCOUT_REQUEST_TIMEOUT_SECS", "15")?;
    let user_agent = or_default("JOBSCOUT_USER_AGENT", DEFAULT_USER_AGENT);
    let accept = or_default("JOBSCOUT_ACCEPT", DEFAULT_ACCEPT);
    let accept_language = or_default("JOBSCOUT_ACCEPT_LANGUAGE", DEFAULT_ACCEPT_LANGUAGE);

    let max_attempts = parse_u32("JOBSCOUT_MAX_ATTEMPTS", "3")?;
    let pacing_min_ms = parse_u64("JOBSCOUT_PACING_MIN_MS", "2000")?;
    let pacing_max_ms = parse_u64("JOBSCOUT_PACING_MAX_MS", "5000")?;
    let rate_limit_cooldown_secs = parse_u64("JOBSCOUT_RATE_LIMIT_COOLDOWN_SECS", "10")?;
    let max_rate_limit_cooldowns = parse_u32("JOBSCOUT_MAX_RATE_LIMIT_COOLDOWNS", "3")?;
    let max_empty_pages = parse_u32("JOBSCOUT_MAX_EMPTY_PAGES", "3")?;
    let max_pages = parse_u32("JOBSCOUT_MAX_PAGES", "100")?;

    if request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "JOBSCOUT_REQUEST_TIMEOUT_SECS must be at least 1".to_string(),
        ));
    }

    if max_attempts == 0 {
        return Err(ConfigError::Validation(
            "JOBSCOUT_MAX_ATTEMPTS must be at least 1".to_string(),
        ));
    }

    if pacing_min_ms > pacing_max_ms {
        return Err(ConfigError::Validation(format!(
            "JOBSCOUT_PACING_MIN_MS ({pacing_min_ms}) must not exceed JOBSCOUT_PACING_MAX_MS ({pacing_max_ms})"
        )));
    }

    if max_empty_pages == 0 || max_pages == 0 {
        return Err(ConfigError::Validation(
            "JOBSCOUT_MAX_EMPTY_PAGES and JOBSCOUT_MAX_PAGES must be at least 1".to_string(),
        ));
    }

    Ok(AppConfig {
        log_level,
        search_url,
        locations_path,
        request_timeout_secs,
        user_agent,
        accept,
        accept_language,
        max_attempts,
        pacing_min_ms,
        pacing_max_ms,
        rate_limit_cooldown_secs,
        max_rate_limit_cooldowns,
        max_empty_pages,
        max_pages,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
