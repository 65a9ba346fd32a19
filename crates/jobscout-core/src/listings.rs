use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single job posting extracted from one page of search results.
///
/// `job_id`, `title` and `url` are always present. The remaining fields are
/// only filled by the detailed extraction profile and are `None` whenever the
/// page did not carry them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// Numeric posting id from the `urn:li:jobPosting:<id>` card attribute.
    pub job_id: String,
    pub title: String,
    /// Posting URL with its tracking query string removed.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Short snippet shown on the search card, when the endpoint includes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listed_on: Option<NaiveDate>,
}

impl ListingRecord {
    #[must_use]
    pub fn new(job_id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            title: title.into(),
            url: url.into(),
            company: None,
            location: None,
            description: None,
            listed_on: None,
        }
    }
}
