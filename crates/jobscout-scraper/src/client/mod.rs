//! HTTP client for the guest job-search endpoint.

mod params;
mod search;

use std::time::Duration;

use jobscout_core::app_config::{
    DEFAULT_ACCEPT, DEFAULT_ACCEPT_LANGUAGE, DEFAULT_SEARCH_URL, DEFAULT_USER_AGENT,
};
use jobscout_core::{AppConfig, GeoParameters, LocationTable, SearchQuery};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, Url};

use crate::error::{AttemptError, ScraperError};
use crate::extract::ExtractionProfile;
use crate::pagination::PaginationLimits;
use crate::rate_limit::{fetch_with_retries, FetchOutcome, RetryPolicy};

pub use params::search_page_url;

/// Browser-like headers sent with every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHeaders {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
}

impl Default for RequestHeaders {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            accept: DEFAULT_ACCEPT.to_owned(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_owned(),
        }
    }
}

/// Everything a [`JobSearchClient`] needs besides the location table.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub search_url: String,
    pub request_timeout: Duration,
    pub headers: RequestHeaders,
    pub retry: RetryPolicy,
    pub limits: PaginationLimits,
    pub profile: ExtractionProfile,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_owned(),
            request_timeout: Duration::from_secs(15),
            headers: RequestHeaders::default(),
            retry: RetryPolicy::default(),
            limits: PaginationLimits::default(),
            profile: ExtractionProfile::default(),
        }
    }
}

impl SearchSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            search_url: config.search_url.clone(),
            request_timeout: config.request_timeout(),
            headers: RequestHeaders {
                user_agent: config.user_agent.clone(),
                accept: config.accept.clone(),
                accept_language: config.accept_language.clone(),
            },
            retry: RetryPolicy::from_app_config(config),
            limits: PaginationLimits::from_app_config(config),
            profile: ExtractionProfile::default(),
        }
    }
}

/// Searches job listings page by page.
///
/// Owns one pooled `reqwest::Client` that is reused for every request of
/// every search and released when the `JobSearchClient` is dropped. All
/// methods take `&self`, so concurrent searches may share one instance.
pub struct JobSearchClient {
    client: Client,
    search_url: Url,
    locations: LocationTable,
    retry: RetryPolicy,
    limits: PaginationLimits,
    profile: ExtractionProfile,
}

impl JobSearchClient {
    /// Creates a client from `settings` that resolves locations through `locations`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidEndpoint`] if `settings.search_url` is not an
    ///   absolute `http`/`https` URL.
    /// - [`ScraperError::InvalidHeader`] if a configured header value is not
    ///   a legal HTTP header value.
    /// - [`ScraperError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed (e.g., invalid TLS config).
    pub fn new(settings: SearchSettings, locations: LocationTable) -> Result<Self, ScraperError> {
        let search_url = parse_endpoint(&settings.search_url)?;
        let client = Client::builder()
            .default_headers(default_headers(&settings.headers)?)
            .timeout(settings.request_timeout)
            .connect_timeout(settings.request_timeout.min(Duration::from_secs(10)))
            .build()?;

        Ok(Self {
            client,
            search_url,
            locations,
            retry: settings.retry,
            limits: settings.limits,
            profile: settings.profile,
        })
    }

    #[must_use]
    pub fn locations(&self) -> &LocationTable {
        &self.locations
    }

    /// Builds the URL for one page of `query` at `offset`.
    #[must_use]
    pub fn page_url(&self, query: &SearchQuery, geo: &GeoParameters, offset: u32) -> Url {
        search_page_url(&self.search_url, query, geo, offset)
    }

    /// Fetches one page through the pacing and retry loop.
    ///
    /// Never fails: 404s, exhausted retries and exhausted rate-limit
    /// cooldowns all come back as [`FetchOutcome::Absent`].
    pub async fn fetch_page(&self, url: &str) -> FetchOutcome {
        fetch_with_retries(&self.retry, url, || async move {
            let response = self.client.get(url).send().await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(AttemptError::RateLimited {
                    url: url.to_owned(),
                });
            }

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(AttemptError::NotFound {
                    url: url.to_owned(),
                });
            }

            if !status.is_success() {
                return Err(AttemptError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            Ok(response.text().await?)
        })
        .await
    }
}

fn default_headers(headers: &RequestHeaders) -> Result<HeaderMap, ScraperError> {
    let mut map = HeaderMap::with_capacity(3);
    for (name, value) in [
        (USER_AGENT, &headers.user_agent),
        (ACCEPT, &headers.accept),
        (ACCEPT_LANGUAGE, &headers.accept_language),
    ] {
        let value = header_value(&name, value)?;
        map.insert(name, value);
    }
    Ok(map)
}

fn header_value(name: &HeaderName, value: &str) -> Result<HeaderValue, ScraperError> {
    HeaderValue::from_str(value).map_err(|e| ScraperError::InvalidHeader {
        name: name.as_str().to_owned(),
        reason: e.to_string(),
    })
}

fn parse_endpoint(raw: &str) -> Result<Url, ScraperError> {
    let url = Url::parse(raw).map_err(|e| ScraperError::InvalidEndpoint {
        url: raw.to_owned(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ScraperError::InvalidEndpoint {
            url: raw.to_owned(),
            reason: format!("unsupported scheme \"{}\"", url.scheme()),
        });
    }

    Ok(url)
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
