//! Search query parameters accepted from callers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest number of listings a caller may request.
pub const MIN_LIMIT: usize = 1;
/// Largest number of listings a caller may request.
pub const MAX_LIMIT: usize = 50;

const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("keywords must be non-empty")]
    EmptyKeywords,

    #[error("location must be non-empty")]
    EmptyLocation,

    #[error("limit {limit} is out of range; must be between 1 and 50")]
    LimitOutOfRange { limit: usize },

    #[error("time filter must be at least one second")]
    ZeroTimeFilter,

    #[error("unknown sort mode \"{0}\"; expected relevance (R) or recency (DD)")]
    UnknownSortMode(String),
}

/// Result ordering requested from the endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortMode {
    #[default]
    #[serde(rename = "R", alias = "relevance")]
    Relevance,
    #[serde(rename = "DD", alias = "recency")]
    Recency,
}

impl SortMode {
    /// Wire value for the `sortBy` query parameter.
    #[must_use]
    pub fn as_param(self) -> &'static str {
        match self {
            SortMode::Relevance => "R",
            SortMode::Recency => "DD",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortMode::Relevance => write!(f, "relevance"),
            SortMode::Recency => write!(f, "recency"),
        }
    }
}

impl FromStr for SortMode {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "R" | "r" | "relevance" => Ok(SortMode::Relevance),
            "DD" | "dd" | "recency" => Ok(SortMode::Recency),
            other => Err(QueryError::UnknownSortMode(other.to_string())),
        }
    }
}

/// An immutable, validated job search request.
///
/// Build one with [`SearchQuery::builder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    keywords: String,
    location: String,
    start: u32,
    limit: usize,
    sort: SortMode,
    time_filter_secs: Option<u64>,
}

impl SearchQuery {
    #[must_use]
    pub fn builder(keywords: impl Into<String>, location: impl Into<String>) -> SearchQueryBuilder {
        SearchQueryBuilder {
            keywords: keywords.into(),
            location: location.into(),
            start: 0,
            limit: DEFAULT_LIMIT,
            sort: SortMode::default(),
            time_filter_secs: None,
        }
    }

    #[must_use]
    pub fn keywords(&self) -> &str {
        &self.keywords
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Offset of the first result to request.
    #[must_use]
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Exact number of listings wanted, within `[MIN_LIMIT, MAX_LIMIT]`.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    #[must_use]
    pub fn sort(&self) -> SortMode {
        self.sort
    }

    /// Only listings posted within this many seconds, when set.
    #[must_use]
    pub fn time_filter_secs(&self) -> Option<u64> {
        self.time_filter_secs
    }
}

#[derive(Debug, Clone)]
pub struct SearchQueryBuilder {
    keywords: String,
    location: String,
    start: u32,
    limit: usize,
    sort: SortMode,
    time_filter_secs: Option<u64>,
}

impl SearchQueryBuilder {
    #[must_use]
    pub fn start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub fn time_filter_secs(mut self, secs: Option<u64>) -> Self {
        self.time_filter_secs = secs;
        self
    }

    /// Validates and freezes the query.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] for blank keywords or location, a limit outside
    /// `[MIN_LIMIT, MAX_LIMIT]`, or a zero time filter.
    pub fn build(self) -> Result<SearchQuery, QueryError> {
        let keywords = self.keywords.trim().to_string();
        if keywords.is_empty() {
            return Err(QueryError::EmptyKeywords);
        }

        let location = self.location.trim().to_string();
        if location.is_empty() {
            return Err(QueryError::EmptyLocation);
        }

        if !(MIN_LIMIT..=MAX_LIMIT).contains(&self.limit) {
            return Err(QueryError::LimitOutOfRange { limit: self.limit });
        }

        if self.time_filter_secs == Some(0) {
            return Err(QueryError::ZeroTimeFilter);
        }

        Ok(SearchQuery {
            keywords,
            location,
            start: self.start,
            limit: self.limit,
            sort: self.sort,
            time_filter_secs: self.time_filter_secs,
        })
    }
}
