mod locations;
mod search;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use jobscout_core::SortMode;
use jobscout_scraper::ExtractionProfile;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "jobscout-cli")]
#[command(about = "Search public job listings from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for listings matching keywords in a known location.
    Search(SearchArgs),
    /// Print the locations the resolver knows about.
    Locations,
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Free-text keywords, e.g. "Machine Learning Engineer".
    #[arg(long, short = 'k')]
    keywords: String,

    /// Location name as it appears in the location table.
    #[arg(long, short = 'l')]
    location: String,

    /// Result offset of the first page.
    #[arg(long, default_value_t = 0)]
    start: u32,

    /// Number of listings to return (1 to 50).
    #[arg(long, short = 'n', default_value_t = 10)]
    limit: usize,

    /// `relevance` (R) or `recency` (DD).
    #[arg(long, default_value = "relevance")]
    sort: SortMode,

    /// Only listings posted within this many seconds.
    #[arg(long)]
    time_filter: Option<u64>,

    /// Extraction profile: `basic` or `detailed`.
    #[arg(long)]
    profile: Option<ExtractionProfile>,

    /// Print a JSON document instead of a table.
    #[arg(long)]
    json: bool,

    /// Relevancy instructions passed through to the JSON output.
    #[arg(long)]
    instructions: Option<String>,

    /// Plain-text resume passed through to the JSON output.
    #[arg(long)]
    resume_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = jobscout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(search_url = %config.search_url, "configuration loaded");

    match cli.command {
        Some(Commands::Search(args)) => search::run_search(&config, args).await?,
        Some(Commands::Locations) => locations::run_locations(&config)?,
        None => println!("no command given; run `jobscout-cli --help`"),
    }

    Ok(())
}
