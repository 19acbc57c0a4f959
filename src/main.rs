use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pubmed_citations::{Client, ClientConfig, SearchQuery, SortOrder, config::DEFAULT_TOOL};
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(
    name = "pubmed-citations",
    about = "Search PubMed and print citation-ready results as JSON",
    version
)]
struct Cli {
    /// PubMed search term, e.g. "sglt2 inhibitors heart failure"
    query: String,

    /// Maximum number of articles to return (at most 9999)
    #[arg(short, long, default_value_t = 5)]
    limit: usize,

    /// Only articles published in or after this year
    #[arg(long)]
    from_year: Option<u32>,

    /// Only articles published in or before this year
    #[arg(long)]
    to_year: Option<u32>,

    /// Only articles with free full text
    #[arg(long)]
    free_full_text: bool,

    /// Result order
    #[arg(long, value_enum, default_value_t = SortArg::Relevance)]
    sort: SortArg,

    /// API key for NCBI E-utilities (increases rate limit)
    #[arg(long, env = "NCBI_API_KEY")]
    api_key: Option<String>,

    /// Email for NCBI requests (recommended)
    #[arg(long, env = "NCBI_EMAIL")]
    email: Option<String>,

    /// Tool name for NCBI requests
    #[arg(long, env = "NCBI_TOOL", default_value = DEFAULT_TOOL)]
    tool: String,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value_t = 10_000)]
    timeout_ms: u64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Relevance,
    Date,
}

impl From<SortArg> for SortOrder {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Relevance => SortOrder::Relevance,
            SortArg::Date => SortOrder::Date,
        }
    }
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new()
            .with_tool(&self.tool)
            .with_timeout(Duration::from_millis(self.timeout_ms));

        if let Some(api_key) = &self.api_key {
            config = config.with_api_key(api_key);
        }
        if let Some(email) = &self.email {
            config = config.with_email(email);
        }
        config
    }

    fn search_query(&self) -> SearchQuery {
        let mut query = SearchQuery::new(&self.query)
            .sort(self.sort.into())
            .max_results(self.limit);

        if let Some(year) = self.from_year {
            query = query.year_from(year);
        }
        if let Some(year) = self.to_year {
            query = query.year_to(year);
        }
        if self.free_full_text {
            query = query.free_full_text_only();
        }
        query
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let client = Client::with_config(cli.client_config());
    let query = cli.search_query();
    debug!(term = %query.build_term(), "Running search");

    let result = client
        .search(&query)
        .await
        .with_context(|| format!("Search for \"{}\" failed", cli.query))?;

    let json = serde_json::to_string_pretty(&result).context("Failed to serialize results")?;
    println!("{json}");

    Ok(())
}
