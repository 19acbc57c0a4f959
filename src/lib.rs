//! # PubMed Citations
//!
//! Async PubMed literature search producing citation-ready results.
//!
//! A search runs ESearch for matching PMIDs, then fetches the records with EFetch
//! while looking up open-access copies through the PMC ID converter, and merges
//! both into a [`SearchResult`].
//!
//! ## Features
//!
//! - **Retry-aware transport**: server errors and timeouts are retried with backoff
//! - **Tolerant parsing**: one malformed record never fails the batch
//! - **Best-effort open access**: ID converter failures only drop the PMC links
//! - **Order preserving**: results follow ESearch relevance or date order
//!
//! ## Quick Start
//!
//! ```no_run
//! use pubmed_citations::{Client, SearchQuery, SortOrder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new();
//!
//!     let query = SearchQuery::new("sglt2 inhibitors heart failure")
//!         .year_from(2020)
//!         .free_full_text_only()
//!         .sort(SortOrder::Date)
//!         .max_results(10);
//!
//!     let result = client.search(&query).await?;
//!     println!("{} total matches", result.total_count);
//!
//!     for article in &result.articles {
//!         println!("{} ({}) {}", article.title, article.authors, article.url);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod formatter;
pub mod http;
pub mod pmc;
pub mod pubmed;
pub mod retry;

use tracing::{info, instrument};

// Re-export main types for convenience
pub use config::ClientConfig;
pub use error::{PubMedError, Result};
pub use formatter::{ArticleResult, ResultKind, SearchResult};
pub use http::HttpTransport;
pub use pmc::{OpenAccessMap, PmcClient};
pub use pubmed::{
    Author, Journal, PubDate, PubMedArticle, PubMedClient, SearchIds, SearchQuery, SortOrder,
};
pub use retry::{RetryConfig, RetryableError};

/// Search pipeline combining PubMed and PMC clients
///
/// Both clients share one HTTP transport and configuration. The client holds no
/// per-request state, so one instance can serve concurrent searches.
#[derive(Clone)]
pub struct Client {
    /// PubMed client for ESearch and EFetch
    pub pubmed: PubMedClient,
    /// PMC client for open-access lookups
    pub pmc: PmcClient,
}

impl Client {
    /// Create a new combined client with default configuration
    pub fn new() -> Self {
        Self::with_config(ClientConfig::new())
    }

    /// Create a new combined client with custom configuration
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_citations::{Client, ClientConfig};
    ///
    /// let config = ClientConfig::new()
    ///     .with_api_key("your_api_key_here")
    ///     .with_email("researcher@university.edu");
    ///
    /// let client = Client::with_config(config);
    /// ```
    pub fn with_config(config: ClientConfig) -> Self {
        let transport = HttpTransport::new(&config);
        Self {
            pubmed: PubMedClient::with_transport(transport.clone(), config.clone()),
            pmc: PmcClient::with_transport(transport, config),
        }
    }

    /// Search PubMed and return formatted articles
    ///
    /// EFetch and the open-access lookup run concurrently once the PMIDs are
    /// known. ESearch and EFetch errors fail the search; open-access errors only
    /// leave `pmc_id` unset.
    #[instrument(skip(self, query), fields(term = %query.term))]
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        let found = self.pubmed.search_ids(query).await?;

        if found.ids.is_empty() {
            info!(total_count = found.total_count, "No PMIDs returned");
            return Ok(SearchResult {
                total_count: found.total_count,
                query_translation: found.query_translation,
                ..SearchResult::default()
            });
        }

        let (xml, open_access) = tokio::join!(
            self.pubmed.fetch_xml(&found.ids),
            self.pmc.resolve_open_access(&found.ids),
        );

        let articles = pubmed::parse_articles_from_xml(&xml?);
        let formatted = formatter::format_results(&found.ids, &articles, &open_access);

        info!(
            requested = found.ids.len(),
            returned = formatted.len(),
            total_count = found.total_count,
            "Search completed"
        );

        Ok(SearchResult {
            articles: formatted,
            total_count: found.total_count,
            query_translation: found.query_translation,
            ..SearchResult::default()
        })
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}
