//! The paginate-fetch-extract loop for `JobSearchClient`.

use jobscout_core::{GeoParameters, ListingRecord, SearchQuery};

use crate::error::ScraperError;
use crate::extract::extract_listings;
use crate::pagination::{Accumulator, SearchOutcome, Termination, PAGE_SIZE};
use crate::rate_limit::FetchOutcome;

use super::JobSearchClient;

impl JobSearchClient {
    /// Maps `location` to the endpoint's geo parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::UnknownLocation`] if the location table has no
    /// entry for `location`.
    pub fn resolve_location(&self, location: &str) -> Result<GeoParameters, ScraperError> {
        tracing::info!(location, "mapping location to ids");
        Ok(self.locations.resolve(location)?)
    }

    /// Runs a full search for `query`.
    ///
    /// Requests pages at `query.start()`, then every [`PAGE_SIZE`] results
    /// after it, until `query.limit()` distinct listings are collected or the
    /// pagination limits stop the loop. Page-level failures never abort the
    /// search; they are counted in [`SearchOutcome::stats`]. A search whose
    /// next offset would overflow `u32` ends with
    /// [`Termination::SourceExhausted`].
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::UnknownLocation`] before any request is made if
    /// the query's location cannot be resolved.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchOutcome, ScraperError> {
        let geo = self.resolve_location(query.location())?;

        tracing::info!(
            keywords = query.keywords(),
            location = query.location(),
            limit = query.limit(),
            start = query.start(),
            sort = %query.sort(),
            "getting jobs"
        );

        let mut acc = Accumulator::new(query.limit());
        let mut offset = query.start();

        let termination = loop {
            if let Some(reason) = acc.stop_reason(self.limits) {
                break reason;
            }

            let url = self.page_url(query, &geo, offset);
            match self.fetch_page(url.as_str()).await {
                FetchOutcome::Body(body) => {
                    let page = extract_listings(&body, self.profile);
                    let found = page.len();
                    let added = acc.record_page(offset, page);
                    tracing::info!(offset, found, added, total = acc.len(), "processed search page");
                }
                FetchOutcome::Absent(absence) => {
                    tracing::warn!(offset, ?absence, "no data for search page");
                    acc.record_absence(offset, absence);
                }
            }

            match offset.checked_add(PAGE_SIZE) {
                Some(next) => offset = next,
                None => {
                    tracing::warn!(offset, "result offset cannot advance past u32::MAX");
                    break acc
                        .stop_reason(self.limits)
                        .unwrap_or(Termination::SourceExhausted);
                }
            }
        };

        let outcome = acc.finish(termination);
        tracing::info!(
            found = outcome.listings.len(),
            rounds = outcome.stats.rounds(),
            ?termination,
            location = query.location(),
            keywords = query.keywords(),
            "search finished"
        );
        Ok(outcome)
    }

    /// Convenience wrapper: returns at most `n_jobs` listings for `keywords`
    /// in `location`, starting at offset `start`, sorted by relevance.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidQuery`] if the parameters fail validation
    ///   (blank keywords, `n_jobs` outside `1..=50`).
    /// - [`ScraperError::UnknownLocation`] if `location` cannot be resolved.
    pub async fn get_jobs(
        &self,
        keywords: &str,
        location: &str,
        start: u32,
        n_jobs: usize,
    ) -> Result<Vec<ListingRecord>, ScraperError> {
        let query = SearchQuery::builder(keywords, location)
            .start(start)
            .limit(n_jobs)
            .build()?;
        Ok(self.search(&query).await?.listings)
    }
}
