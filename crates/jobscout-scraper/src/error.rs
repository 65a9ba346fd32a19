use jobscout_core::{QueryError, UnknownLocation};
use thiserror::Error;

/// Errors that stop a search before or while it is set up.
///
/// Failures of individual page fetches never appear here: they are absorbed
/// by the retry loop and reported as [`crate::Absence`] instead.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error(transparent)]
    UnknownLocation(#[from] UnknownLocation),

    #[error("invalid search query: {0}")]
    InvalidQuery(#[from] QueryError),

    #[error("invalid search endpoint \"{url}\": {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("invalid value for request header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Why a single request attempt did not produce a body.
#[derive(Debug, Error)]
pub(crate) enum AttemptError {
    #[error("rate limited (HTTP 429) by {url}")]
    RateLimited { url: String },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("connection error: {0}")]
    Http(#[from] reqwest::Error),
}
