//! Integration tests for `JobSearchClient`.
//!
//! Every test stands up a local `wiremock` server in place of the guest
//! search endpoint, with pacing disabled and a short rate-limit cooldown.

use std::time::{Duration, Instant};

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jobscout_core::{LocationTable, SearchQuery};
use jobscout_scraper::{
    Absence, FetchOutcome, JobSearchClient, PaginationLimits, RetryPolicy, ScraperError,
    SearchSettings, Termination,
};

const COOLDOWN: Duration = Duration::from_millis(100);

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        pacing_min: Duration::ZERO,
        pacing_max: Duration::ZERO,
        rate_limit_cooldown: COOLDOWN,
        max_rate_limit_cooldowns: 1,
    }
}

fn test_client_with(server: &MockServer, limits: PaginationLimits) -> JobSearchClient {
    let settings = SearchSettings {
        search_url: format!("{}/search", server.uri()),
        request_timeout: Duration::from_secs(5),
        retry: fast_retry(),
        limits,
        ..SearchSettings::default()
    };
    JobSearchClient::new(settings, LocationTable::builtin()).expect("failed to build test client")
}

fn test_client(server: &MockServer) -> JobSearchClient {
    test_client_with(server, PaginationLimits::default())
}

/// One job card in the shape the endpoint returns.
fn card_html(id: u64, title: &str, company: &str) -> String {
    format!(
        r#"<li>
  <div class="base-card base-search-card job-search-card" data-entity-urn="urn:li:jobPosting:{id}">
    <a class="base-card__full-link" href="https://dk.linkedin.com/jobs/view/job-{id}?position=1&amp;trk=public_jobs">
      <span class="sr-only">{title}</span>
    </a>
    <div class="base-search-card__info">
      <h3 class="base-search-card__title">
        {title}
      </h3>
      <h4 class="base-search-card__subtitle">
        <a class="hidden-nested-link" href="https://dk.linkedin.com/company/x?trk=y">{company}</a>
      </h4>
      <span class="job-search-card__location">Copenhagen, Denmark</span>
    </div>
  </div>
</li>"#
    )
}

/// A page of cards with ids `first..first + count`.
fn page_html(first: u64, count: u64) -> String {
    (first..first + count)
        .map(|id| card_html(id, &format!("Engineer {id}"), "Acme ApS"))
        .collect()
}

async fn mount_page(server: &MockServer, start: &str, body: String) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("start", start))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn query(limit: usize) -> SearchQuery {
    SearchQuery::builder("Machine Learning Engineer", "Denmark")
        .limit(limit)
        .build()
        .expect("valid query")
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_page_404_is_absent_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let outcome = client.fetch_page(&format!("{}/search", server.uri())).await;

    assert_eq!(outcome, FetchOutcome::Absent(Absence::NotFound));
}

#[tokio::test]
async fn fetch_page_sends_browser_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<ul></ul>"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let outcome = client.fetch_page(&format!("{}/search", server.uri())).await;
    assert_eq!(outcome.body(), Some("<ul></ul>"));

    let requests = server.received_requests().await.expect("recording enabled");
    let headers = &requests[0].headers;
    let ua = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(ua.starts_with("Mozilla/5.0"), "unexpected user agent: {ua}");
    assert_eq!(
        headers.get("accept-language").and_then(|v| v.to_str().ok()),
        Some("en-US,en;q=0.5")
    );
}

#[tokio::test]
async fn fetch_page_cools_down_after_429_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let started = Instant::now();
    let outcome = client.fetch_page(&format!("{}/search", server.uri())).await;

    assert_eq!(outcome.body(), Some("ok"));
    assert!(started.elapsed() >= COOLDOWN, "429 must be followed by a cooldown");
    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn fetch_page_gives_up_when_still_rate_limited() {
    let server = MockServer::start().await;
    // One cooldown allowed: the second 429 ends the page.
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let outcome = client.fetch_page(&format!("{}/search", server.uri())).await;

    assert_eq!(outcome, FetchOutcome::Absent(Absence::RateLimited));
}

#[tokio::test]
async fn fetch_page_retries_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("third time"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let outcome = client.fetch_page(&format!("{}/search", server.uri())).await;

    assert_eq!(outcome.body(), Some("third time"));
}

#[tokio::test]
async fn fetch_page_exhausts_retries_on_persistent_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let outcome = client.fetch_page(&format!("{}/search", server.uri())).await;

    assert_eq!(outcome, FetchOutcome::Absent(Absence::RetriesExhausted));
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_collects_exactly_the_requested_count() {
    let server = MockServer::start().await;
    mount_page(&server, "0", page_html(1000, 4)).await;
    mount_page(&server, "10", page_html(2000, 4)).await;
    mount_page(&server, "20", page_html(3000, 4)).await;

    let client = test_client(&server);
    let outcome = client.search(&query(10)).await.expect("search succeeds");

    assert_eq!(outcome.listings.len(), 10);
    assert_eq!(outcome.termination, Termination::Satisfied);
    assert_eq!(outcome.stats.offsets, vec![0, 10, 20]);
    assert_eq!(outcome.listings[0].job_id, "1000");
    assert_eq!(outcome.listings[9].job_id, "3001");

    for listing in &outcome.listings {
        assert!(!listing.job_id.is_empty());
        assert!(!listing.title.is_empty());
        assert!(!listing.url.contains('?'), "url kept tracking query: {}", listing.url);
        assert_eq!(listing.company.as_deref(), Some("Acme ApS"));
    }
}

#[tokio::test]
async fn search_sends_resolved_geo_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("keywords", "Machine Learning Engineer"))
        .and(query_param("location", "Denmark"))
        .and(query_param("geoId", "104514075"))
        .and(query_param("f_PP", "102194656,100926626,106013036"))
        .and(query_param("start", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_html(1, 2)))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let outcome = client.search(&query(2)).await.expect("search succeeds");

    assert_eq!(outcome.listings.len(), 2);
    assert_eq!(outcome.termination, Termination::Satisfied);
}

#[tokio::test]
async fn search_unknown_location_makes_no_requests() {
    let server = MockServer::start().await;
    let client = test_client(&server);
    let query = SearchQuery::builder("Rust", "Atlantis")
        .build()
        .expect("valid query");

    let result = client.search(&query).await;

    assert!(
        matches!(result, Err(ScraperError::UnknownLocation(_))),
        "expected UnknownLocation"
    );
    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests.is_empty());
}

#[tokio::test]
async fn search_stops_after_consecutive_empty_pages() {
    let server = MockServer::start().await;
    mount_page(&server, "0", page_html(1, 3)).await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let outcome = client.search(&query(10)).await.expect("search succeeds");

    assert_eq!(outcome.listings.len(), 3);
    assert_eq!(outcome.termination, Termination::SourceExhausted);
    assert_eq!(outcome.stats.offsets, vec![0, 10, 20, 30]);
    assert_eq!(outcome.stats.empty_rounds, 3);
}

#[tokio::test]
async fn search_drops_repeated_listings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_html(1, 4)))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let outcome = client.search(&query(10)).await.expect("search succeeds");

    let ids: Vec<&str> = outcome.listings.iter().map(|l| l.job_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4"]);
    assert_eq!(outcome.termination, Termination::SourceExhausted);
    assert_eq!(outcome.stats.duplicates_dropped, 12);
}

#[tokio::test]
async fn search_respects_page_limit() {
    let server = MockServer::start().await;
    mount_page(&server, "0", page_html(100, 2)).await;
    mount_page(&server, "10", page_html(200, 2)).await;

    let limits = PaginationLimits {
        max_empty_pages: 3,
        max_pages: 2,
    };
    let client = test_client_with(&server, limits);
    let outcome = client.search(&query(10)).await.expect("search succeeds");

    assert_eq!(outcome.listings.len(), 4);
    assert_eq!(outcome.termination, Termination::PageLimit);
    assert_eq!(outcome.stats.rounds(), 2);
}

#[tokio::test]
async fn search_continues_past_a_failed_page() {
    let server = MockServer::start().await;
    mount_page(&server, "0", page_html(1, 4)).await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("start", "10"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&server)
        .await;
    mount_page(&server, "20", page_html(20, 4)).await;
    mount_page(&server, "30", page_html(30, 4)).await;

    let client = test_client(&server);
    let outcome = client.search(&query(10)).await.expect("search succeeds");

    assert_eq!(outcome.listings.len(), 10);
    assert_eq!(outcome.termination, Termination::Satisfied);
    assert_eq!(outcome.stats.offsets, vec![0, 10, 20, 30]);
    assert_eq!(outcome.stats.exhausted_rounds, 1);
}

#[tokio::test]
async fn search_honours_custom_start_offset() {
    let server = MockServer::start().await;
    mount_page(&server, "25", page_html(1, 3)).await;
    mount_page(&server, "35", page_html(10, 3)).await;

    let client = test_client(&server);
    let query = SearchQuery::builder("Rust", "Denmark")
        .start(25)
        .limit(5)
        .build()
        .expect("valid query");
    let outcome = client.search(&query).await.expect("search succeeds");

    assert_eq!(outcome.stats.offsets, vec![25, 35]);
    assert_eq!(outcome.listings.len(), 5);
}

#[tokio::test]
async fn search_stops_when_offset_would_overflow() {
    let server = MockServer::start().await;
    let last = u32::MAX - 5;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("start", last.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_html(1, 2)))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let query = SearchQuery::builder("Rust", "Denmark")
        .start(last)
        .limit(10)
        .build()
        .expect("valid query");
    let outcome = client.search(&query).await.expect("search succeeds");

    assert_eq!(outcome.stats.offsets, vec![last]);
    assert_eq!(outcome.listings.len(), 2);
    assert_eq!(outcome.termination, Termination::SourceExhausted);
}

#[tokio::test]
async fn get_jobs_returns_records_only() {
    let server = MockServer::start().await;
    mount_page(&server, "0", page_html(7, 3)).await;

    let client = test_client(&server);
    let jobs = client
        .get_jobs("Machine Learning Engineer", "Denmark", 0, 2)
        .await
        .expect("get_jobs succeeds");

    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].job_id, "7");
}

#[tokio::test]
async fn get_jobs_rejects_out_of_range_count() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    let result = client.get_jobs("Rust", "Denmark", 0, 51).await;

    assert!(matches!(result, Err(ScraperError::InvalidQuery(_))));
}
