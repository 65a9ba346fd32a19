//! Offset pagination bookkeeping for a single search.
//!
//! The endpoint pages by a `start` offset that advances by [`PAGE_SIZE`] per
//! round whether or not the previous round yielded anything. It never says
//! when results run out, so [`Accumulator`] tracks rounds that add nothing
//! new and the search stops after [`PaginationLimits::max_empty_pages`] of
//! them in a row, or after [`PaginationLimits::max_pages`] rounds overall.

use std::collections::HashSet;

use jobscout_core::{AppConfig, ListingRecord};
use serde::Serialize;

use crate::rate_limit::Absence;

/// Offset increment between successive rounds.
pub const PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationLimits {
    /// Consecutive rounds without new listings before the source counts as exhausted.
    pub max_empty_pages: u32,
    /// Hard cap on rounds per search.
    pub max_pages: u32,
}

impl Default for PaginationLimits {
    fn default() -> Self {
        Self {
            max_empty_pages: 3,
            max_pages: 100,
        }
    }
}

impl PaginationLimits {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_empty_pages: config.max_empty_pages,
            max_pages: config.max_pages,
        }
    }
}

/// Why a search stopped issuing requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The requested number of listings was reached.
    Satisfied,
    /// Too many consecutive rounds produced no new listings.
    SourceExhausted,
    /// The per-search round cap was hit first.
    PageLimit,
}

/// Per-search counters, mostly useful for telling apart the reasons a
/// search came back short.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Offsets requested, in order.
    pub offsets: Vec<u32>,
    /// Rounds that added no new listings, for any reason.
    pub empty_rounds: u32,
    pub not_found_rounds: u32,
    pub exhausted_rounds: u32,
    pub rate_limited_rounds: u32,
    /// Listings dropped because their id had already been seen.
    pub duplicates_dropped: u32,
}

impl SearchStats {
    #[must_use]
    pub fn rounds(&self) -> usize {
        self.offsets.len()
    }
}

/// Final result of a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    /// Listings in discovery order, at most the requested count.
    pub listings: Vec<ListingRecord>,
    pub termination: Termination,
    pub stats: SearchStats,
}

/// Collects listings across rounds, dropping repeated ids.
#[derive(Debug)]
pub(crate) struct Accumulator {
    wanted: usize,
    listings: Vec<ListingRecord>,
    seen: HashSet<String>,
    consecutive_empty: u32,
    stats: SearchStats,
}

impl Accumulator {
    pub(crate) fn new(wanted: usize) -> Self {
        Self {
            wanted,
            listings: Vec::with_capacity(wanted),
            seen: HashSet::new(),
            consecutive_empty: 0,
            stats: SearchStats::default(),
        }
    }

    pub(crate) fn is_satisfied(&self) -> bool {
        self.listings.len() >= self.wanted
    }

    /// Decides whether another round may run; `None` means it may.
    pub(crate) fn stop_reason(&self, limits: PaginationLimits) -> Option<Termination> {
        if self.is_satisfied() {
            return Some(Termination::Satisfied);
        }
        if self.consecutive_empty >= limits.max_empty_pages.max(1) {
            return Some(Termination::SourceExhausted);
        }
        if self.stats.offsets.len() >= limits.max_pages as usize {
            return Some(Termination::PageLimit);
        }
        None
    }

    /// Records a round whose page was fetched and extracted. Returns the number
    /// of listings that were new.
    pub(crate) fn record_page(&mut self, offset: u32, page: Vec<ListingRecord>) -> usize {
        self.stats.offsets.push(offset);
        let mut added = 0usize;
        for listing in page {
            if self.seen.insert(listing.job_id.clone()) {
                self.listings.push(listing);
                added += 1;
            } else {
                self.stats.duplicates_dropped += 1;
            }
        }
        if added == 0 {
            self.mark_empty();
        } else {
            self.consecutive_empty = 0;
        }
        added
    }

    /// Records a round whose page could not be fetched.
    pub(crate) fn record_absence(&mut self, offset: u32, absence: Absence) {
        self.stats.offsets.push(offset);
        match absence {
            Absence::NotFound => self.stats.not_found_rounds += 1,
            Absence::RetriesExhausted => self.stats.exhausted_rounds += 1,
            Absence::RateLimited => self.stats.rate_limited_rounds += 1,
        }
        self.mark_empty();
    }

    pub(crate) fn len(&self) -> usize {
        self.listings.len()
    }

    /// Truncates to the requested count and freezes the result.
    pub(crate) fn finish(mut self, termination: Termination) -> SearchOutcome {
        self.listings.truncate(self.wanted);
        SearchOutcome {
            listings: self.listings,
            termination,
            stats: self.stats,
        }
    }

    fn mark_empty(&mut self) {
        self.consecutive_empty += 1;
        self.stats.empty_rounds += 1;
    }
}
