use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{PubMedError, Result};
use crate::http::{HttpTransport, build_url};
use crate::pubmed::models::PubMedArticle;
use crate::pubmed::parser::parse_articles_from_xml;
use crate::pubmed::query::SearchQuery;
use crate::pubmed::responses::ESearchResult;

/// PubMed limits retmax to 9999; later results are unreachable through ESearch
pub const MAX_RETRIEVABLE: usize = 9999;

/// Outcome of an ESearch request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIds {
    /// PMIDs in the order ESearch returned them
    pub ids: Vec<String>,
    /// Total number of matching records, not just the returned ones
    pub total_count: u64,
    /// How PubMed interpreted the term
    pub query_translation: Option<String>,
    /// Entries of the ESearch `errorlist`, as "kind: value"
    pub errors: Vec<String>,
    /// Entries of the ESearch `warninglist`, as "kind: value"
    pub warnings: Vec<String>,
}

/// Client for the ESearch and EFetch E-utilities
#[derive(Clone)]
pub struct PubMedClient {
    transport: HttpTransport,
    config: ClientConfig,
}

impl PubMedClient {
    /// Create a new PubMed client with default configuration
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_citations::PubMedClient;
    ///
    /// let client = PubMedClient::new();
    /// ```
    pub fn new() -> Self {
        Self::with_config(ClientConfig::new())
    }

    /// Create a new PubMed client with custom configuration
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_citations::{ClientConfig, PubMedClient};
    ///
    /// let config = ClientConfig::new()
    ///     .with_api_key("your_api_key_here")
    ///     .with_email("researcher@university.edu");
    ///
    /// let client = PubMedClient::with_config(config);
    /// ```
    pub fn with_config(config: ClientConfig) -> Self {
        let transport = HttpTransport::new(&config);
        Self::with_transport(transport, config)
    }

    /// Share an existing transport, e.g. with a [`crate::PmcClient`]
    pub fn with_transport(transport: HttpTransport, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Run ESearch for `query` and return the matching PMIDs
    ///
    /// An empty or whitespace-only term yields empty results without a request.
    ///
    /// # Errors
    ///
    /// * `PubMedError::SearchLimitExceeded` when more than 9999 results are requested
    /// * `PubMedError::InvalidQuery` when zero results are requested
    /// * `PubMedError::ApiError` for non-success statuses and for a 200 response
    ///   carrying an `ERROR` field
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_citations::{PubMedClient, SearchQuery};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PubMedClient::new();
    ///     let found = client
    ///         .search_ids(&SearchQuery::new("metformin").year_from(2020).max_results(10))
    ///         .await?;
    ///     println!("{} of {} PMIDs", found.ids.len(), found.total_count);
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self, query), fields(term = %query.term))]
    pub async fn search_ids(&self, query: &SearchQuery) -> Result<SearchIds> {
        let retmax = query
            .max_results
            .unwrap_or(self.config.default_max_results);

        if retmax > MAX_RETRIEVABLE {
            return Err(PubMedError::SearchLimitExceeded {
                requested: retmax,
                maximum: MAX_RETRIEVABLE,
            });
        }

        if retmax == 0 {
            return Err(PubMedError::InvalidQuery(
                "max_results must be at least 1".to_string(),
            ));
        }

        if query.term.trim().is_empty() {
            debug!("Empty query provided, returning empty results");
            return Ok(SearchIds::default());
        }

        let mut params = vec![
            ("db".to_string(), "pubmed".to_string()),
            ("term".to_string(), query.build_term()),
            ("retmax".to_string(), retmax.to_string()),
            ("retmode".to_string(), "json".to_string()),
            ("sort".to_string(), query.sort.as_api_param().to_string()),
        ];
        params.extend(self.config.build_api_params());

        let url = build_url(
            &format!("{}/esearch.fcgi", self.config.effective_base_url()),
            &params,
        );

        debug!("Making ESearch API request");
        let response: ESearchResult = self
            .transport
            .get_json(&url, &self.config.retry_config, "ESearch")
            .await?;
        let data = response.esearchresult;

        // NCBI sometimes returns 200 OK with an ERROR field
        if let Some(error_msg) = &data.error {
            return Err(PubMedError::ApiError {
                status: 200,
                message: format!("NCBI ESearch API error: {}", error_msg),
            });
        }

        let errors = data
            .errorlist
            .as_ref()
            .map(|list| list.to_messages())
            .unwrap_or_default();
        let warnings = data
            .warninglist
            .as_ref()
            .map(|list| list.to_messages())
            .unwrap_or_default();

        for message in errors.iter().chain(&warnings) {
            warn!(message = %message, "ESearch reported a problem with the query");
        }

        let total_count: u64 = data
            .count
            .as_deref()
            .and_then(|c| c.parse().ok())
            .unwrap_or(0);

        info!(
            returned = data.idlist.len(),
            total_count, "ESearch completed"
        );

        Ok(SearchIds {
            ids: data.idlist,
            total_count,
            query_translation: data.querytranslation,
            errors,
            warnings,
        })
    }

    /// Fetch the EFetch XML for `pmids` in a single request
    ///
    /// Returns an empty string without a request when `pmids` is empty.
    #[instrument(skip(self, pmids), fields(pmids_count = pmids.len()))]
    pub async fn fetch_xml(&self, pmids: &[String]) -> Result<String> {
        if pmids.is_empty() {
            debug!("No PMIDs to fetch");
            return Ok(String::new());
        }

        let mut params = vec![
            ("db".to_string(), "pubmed".to_string()),
            ("id".to_string(), pmids.join(",")),
            ("rettype".to_string(), "xml".to_string()),
            ("retmode".to_string(), "xml".to_string()),
        ];
        params.extend(self.config.build_api_params());

        let url = build_url(
            &format!("{}/efetch.fcgi", self.config.effective_base_url()),
            &params,
        );

        debug!("Making EFetch API request");
        let xml = self
            .transport
            .get_text(&url, &self.config.retry_config, "EFetch")
            .await?;

        info!(bytes = xml.len(), "EFetch completed");
        Ok(xml)
    }

    /// Fetch and parse the records for `pmids`
    ///
    /// Records that fail to parse are skipped, so fewer articles than PMIDs may
    /// come back.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_citations::PubMedClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PubMedClient::new();
    ///     let pmids = vec!["31978945".to_string(), "33515491".to_string()];
    ///     for article in client.fetch_articles(&pmids).await? {
    ///         println!("{}: {}", article.pmid, article.title);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn fetch_articles(&self, pmids: &[String]) -> Result<Vec<PubMedArticle>> {
        let xml = self.fetch_xml(pmids).await?;
        Ok(parse_articles_from_xml(&xml))
    }
}

impl Default for PubMedClient {
    fn default() -> Self {
        Self::new()
    }
}
