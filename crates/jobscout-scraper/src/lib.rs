pub mod client;
pub mod error;
pub mod extract;
pub mod pagination;
pub mod rate_limit;

pub use client::{search_page_url, JobSearchClient, RequestHeaders, SearchSettings};
pub use error::ScraperError;
pub use extract::{extract_listings, strip_tracking, ExtractionProfile};
pub use pagination::{PaginationLimits, SearchOutcome, SearchStats, Termination, PAGE_SIZE};
pub use rate_limit::{Absence, FetchOutcome, RetryPolicy};
