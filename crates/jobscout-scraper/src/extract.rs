//! Listing extraction from search result HTML.
//!
//! The endpoint returns a fragment of `<li>` job cards. Each card carries a
//! `data-entity-urn="urn:li:jobPosting:<id>"` attribute; the page is split
//! at those attributes and every slice is read on its own, so a field missing
//! from one card can never be filled from its neighbour.
//!
//! Two extraction profiles share the same [`ListingRecord`] schema:
//!
//! | Profile | `job_id` `url` `title` | `company` `location` `description` `listed_on` |
//! |---------|------------------------|-----------------------------------------------|
//! | [`ExtractionProfile::Basic`] | required | always `None` |
//! | [`ExtractionProfile::Detailed`] | required | `Some` when present on the card |
//!
//! A card without an id, a `/jobs/view/` link or a title is skipped.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use jobscout_core::ListingRecord;
use regex::Regex;

static CARD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"data-entity-urn\s*=\s*"urn:li:jobPosting:(\d+)""#).expect("valid card regex")
});

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)href\s*=\s*"([^"]*/jobs/view/[^"]*)""#).expect("valid job url regex")
});

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<h3[^>]*class\s*=\s*"[^"]*base-search-card__title[^"]*"[^>]*>(.*?)</h3>"#)
        .expect("valid title regex")
});

static SR_ONLY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<span[^>]*class\s*=\s*"sr-only"[^>]*>(.*?)</span>"#)
        .expect("valid sr-only regex")
});

static COMPANY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<h4[^>]*class\s*=\s*"[^"]*base-search-card__subtitle[^"]*"[^>]*>(.*?)</h4>"#,
    )
    .expect("valid company regex")
});

static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<span[^>]*class\s*=\s*"[^"]*job-search-card__location[^"]*"[^>]*>(.*?)</span>"#,
    )
    .expect("valid location regex")
});

static SNIPPET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<p[^>]*class\s*=\s*"[^"]*job-search-card__snippet[^"]*"[^>]*>(.*?)</p>"#)
        .expect("valid snippet regex")
});

static LISTDATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<time[^>]*class\s*=\s*"[^"]*job-search-card__listdate[^"]*"[^>]*datetime\s*=\s*"(\d{4}-\d{2}-\d{2})""#,
    )
    .expect("valid listdate regex")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<[^>]+>").expect("valid tags regex"));

/// Which fields the extractor fills.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtractionProfile {
    /// Id, URL and title only.
    Basic,
    /// Id, URL and title plus company, location, snippet and listing date.
    #[default]
    Detailed,
}

impl fmt::Display for ExtractionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionProfile::Basic => write!(f, "basic"),
            ExtractionProfile::Detailed => write!(f, "detailed"),
        }
    }
}

impl FromStr for ExtractionProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" | "v1" => Ok(ExtractionProfile::Basic),
            "detailed" | "v2" => Ok(ExtractionProfile::Detailed),
            other => Err(format!("unknown extraction profile \"{other}\"")),
        }
    }
}

/// Extracts every listing on `page`, in page order.
///
/// A page with no job cards yields an empty vector.
#[must_use]
pub fn extract_listings(page: &str, profile: ExtractionProfile) -> Vec<ListingRecord> {
    let cards: Vec<(usize, &str)> = CARD_RE
        .captures_iter(page)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            let id = cap.get(1)?;
            Some((whole.start(), id.as_str()))
        })
        .collect();

    let mut listings = Vec::with_capacity(cards.len());
    for (i, (start, job_id)) in cards.iter().enumerate() {
        let end = cards.get(i + 1).map_or(page.len(), |(next, _)| *next);
        let fragment = &page[*start..end];

        match extract_card(job_id, fragment, profile) {
            Some(listing) => listings.push(listing),
            None => tracing::debug!(job_id, "skipping job card without url or title"),
        }
    }

    listings
}

fn extract_card(job_id: &str, fragment: &str, profile: ExtractionProfile) -> Option<ListingRecord> {
    let url = URL_RE
        .captures(fragment)
        .and_then(|cap| cap.get(1))
        .map(|m| strip_tracking(m.as_str()))
        .filter(|u| !u.is_empty())?;

    let title = first_text(&TITLE_RE, fragment).or_else(|| first_text(&SR_ONLY_RE, fragment))?;

    let mut listing = ListingRecord::new(job_id, title, url);
    if profile == ExtractionProfile::Detailed {
        listing.company = first_text(&COMPANY_RE, fragment);
        listing.location = first_text(&LOCATION_RE, fragment);
        listing.description = first_text(&SNIPPET_RE, fragment);
        listing.listed_on = LISTDATE_RE
            .captures(fragment)
            .and_then(|cap| cap.get(1))
            .and_then(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok());
    }

    Some(listing)
}

fn first_text(re: &Regex, fragment: &str) -> Option<String> {
    re.captures(fragment)
        .and_then(|cap| cap.get(1))
        .map(|m| clean_text(m.as_str()))
        .filter(|s| !s.is_empty())
}

/// Drops everything from the first `?` on, removing tracking parameters.
#[must_use]
pub fn strip_tracking(raw_url: &str) -> String {
    let url = raw_url.split('?').next().unwrap_or(raw_url);
    decode_entities(url.trim())
}

/// Removes tags, decodes basic entities and collapses whitespace.
pub(crate) fn clean_text(input: &str) -> String {
    let no_tags = TAG_RE.replace_all(input, " ");
    decode_entities(&no_tags)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    // `&amp;` last so an encoded entity is not decoded twice.
    input
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
