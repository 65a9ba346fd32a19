//! Query string construction for search page requests.

use jobscout_core::{GeoParameters, SearchQuery};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Url;

/// Characters left as-is inside a query value; everything else is escaped.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// Builds the request URL for the page of `query` starting at `offset`.
///
/// Parameter order: `keywords`, `location`, `geoId`, `f_PP` (omitted when
/// there are no facets), `start`, `sortBy`, then `f_TPR` when a time filter
/// is set. Any query string already on `base` is replaced.
#[must_use]
pub fn search_page_url(base: &Url, query: &SearchQuery, geo: &GeoParameters, offset: u32) -> Url {
    let mut pairs = vec![
        format!("keywords={}", encode(query.keywords())),
        format!("location={}", encode(query.location())),
        format!("geoId={}", geo.geo_id),
    ];

    if !geo.facets.is_empty() {
        pairs.push(format!("f_PP={}", encode(&geo.joined_facets())));
    }

    pairs.push(format!("start={offset}"));
    pairs.push(format!("sortBy={}", query.sort().as_param()));

    if let Some(secs) = query.time_filter_secs() {
        pairs.push(format!("f_TPR=r{secs}"));
    }

    let mut url = base.clone();
    url.set_query(Some(&pairs.join("&")));
    url
}
