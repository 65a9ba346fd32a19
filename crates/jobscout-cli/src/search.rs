//! `search` command handler.

use std::fmt::Write as _;
use std::path::Path;

use jobscout_core::{
    AppConfig, ListingRecord, LocationTable, RelevancyInstructions, ResumeInput, SearchQuery,
};
use jobscout_scraper::{JobSearchClient, SearchOutcome, SearchSettings, Termination};
use serde::Serialize;

use crate::SearchArgs;

/// Everything `--json` prints.
#[derive(Debug, Serialize)]
pub(crate) struct SearchReport<'a> {
    pub(crate) query: &'a SearchQuery,
    pub(crate) instructions: Option<&'a RelevancyInstructions>,
    pub(crate) resume: Option<&'a ResumeInput>,
    pub(crate) outcome: &'a SearchOutcome,
}

/// Runs one search and prints the result.
///
/// # Errors
///
/// Returns an error if the location table cannot be loaded, the query is
/// invalid, the location is unknown, or the resume file cannot be read.
/// Pages that fail to load only shorten the result.
pub(crate) async fn run_search(config: &AppConfig, args: SearchArgs) -> anyhow::Result<()> {
    let locations = LocationTable::from_optional_path(config.locations_path.as_deref())?;

    let mut settings = SearchSettings::from_app_config(config);
    if let Some(profile) = args.profile {
        settings.profile = profile;
    }
    let client = JobSearchClient::new(settings, locations)
        .map_err(|e| anyhow::anyhow!("failed to build search client: {e}"))?;

    let query = SearchQuery::builder(args.keywords, args.location)
        .start(args.start)
        .limit(args.limit)
        .sort(args.sort)
        .time_filter_secs(args.time_filter)
        .build()?;

    let resume = args
        .resume_file
        .as_deref()
        .map(read_resume)
        .transpose()?;
    let instructions = args
        .instructions
        .map(|instructions| RelevancyInstructions { instructions });

    let outcome = client.search(&query).await?;

    if args.json {
        let report = SearchReport {
            query: &query,
            instructions: instructions.as_ref(),
            resume: resume.as_ref(),
            outcome: &outcome,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if outcome.listings.is_empty() {
        println!(
            "no listings found for \"{}\" in {}",
            query.keywords(),
            query.location()
        );
    } else {
        println!(
            "{:<14}{:<42}{:<26}{:<30}URL",
            "ID", "TITLE", "COMPANY", "LOCATION"
        );
        for listing in &outcome.listings {
            println!("{}", listing_row(listing));
        }
    }
    println!("{}", summary_line(&outcome));

    Ok(())
}

fn read_resume(path: &Path) -> anyhow::Result<ResumeInput> {
    tracing::debug!(path = %path.display(), "reading resume");
    let resume = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read resume file {}: {e}", path.display()))?;
    Ok(ResumeInput { resume })
}

pub(crate) fn listing_row(listing: &ListingRecord) -> String {
    format!(
        "{:<14}{:<42}{:<26}{:<30}{}",
        listing.job_id,
        listing.title,
        listing.company.as_deref().unwrap_or("-"),
        listing.location.as_deref().unwrap_or("-"),
        listing.url
    )
}

pub(crate) fn summary_line(outcome: &SearchOutcome) -> String {
    let reason = match outcome.termination {
        Termination::Satisfied => "requested count reached",
        Termination::SourceExhausted => "no more results",
        Termination::PageLimit => "page limit reached",
    };
    let stats = &outcome.stats;
    let mut line = format!(
        "{} listings, {reason} after {} rounds",
        outcome.listings.len(),
        stats.rounds()
    );
    let failed = stats.not_found_rounds + stats.exhausted_rounds + stats.rate_limited_rounds;
    if failed > 0 {
        let _ = write!(line, " ({failed} pages could not be fetched)");
    }
    line
}
