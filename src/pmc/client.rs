use std::collections::HashMap;

use tracing::{debug, info, instrument, warn};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{HttpTransport, build_url};
use crate::pubmed::responses::{IdConvRecord, IdConvResponse};

/// PMID → PMC id lookup result
///
/// `Some(pmcid)` means the article is in PMC, `None` means it was checked and is
/// not. A PMID missing from the map was not resolved.
pub type OpenAccessMap = HashMap<String, Option<String>>;

/// Client for the PMC ID converter
#[derive(Clone)]
pub struct PmcClient {
    transport: HttpTransport,
    config: ClientConfig,
}

impl PmcClient {
    /// Create a new PMC client with default configuration
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_citations::PmcClient;
    ///
    /// let client = PmcClient::new();
    /// ```
    pub fn new() -> Self {
        Self::with_config(ClientConfig::new())
    }

    /// Create a new PMC client with custom configuration
    pub fn with_config(config: ClientConfig) -> Self {
        let transport = HttpTransport::new(&config);
        Self::with_transport(transport, config)
    }

    /// Share an existing transport, e.g. with a [`crate::PubMedClient`]
    pub fn with_transport(transport: HttpTransport, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    /// Look up which of `pmids` have a PMC copy
    ///
    /// Any failure (network, status, malformed JSON) is logged and yields an empty
    /// map; callers treat missing entries as "not known to be free".
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_citations::PmcClient;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let client = PmcClient::new();
    ///     let map = client.resolve_open_access(&["33515491".to_string()]).await;
    ///     if let Some(Some(pmcid)) = map.get("33515491") {
    ///         println!("PMC available: {}", pmcid);
    ///     }
    /// }
    /// ```
    #[instrument(skip(self, pmids), fields(pmids_count = pmids.len()))]
    pub async fn resolve_open_access(&self, pmids: &[String]) -> OpenAccessMap {
        if pmids.is_empty() {
            debug!("No PMIDs to resolve");
            return OpenAccessMap::new();
        }

        match self.fetch_id_conversions(pmids).await {
            Ok(map) => {
                let available = map.values().filter(|pmcid| pmcid.is_some()).count();
                info!(
                    checked = map.len(),
                    available, "Open-access resolution completed"
                );
                map
            }
            Err(e) => {
                warn!(error = %e, "Open-access resolution failed, continuing without it");
                OpenAccessMap::new()
            }
        }
    }

    async fn fetch_id_conversions(&self, pmids: &[String]) -> Result<OpenAccessMap> {
        let mut params = vec![
            ("ids".to_string(), pmids.join(",")),
            ("format".to_string(), "json".to_string()),
        ];
        params.extend(self.config.build_contact_params());

        let url = build_url(&self.config.idconv_url, &params);

        debug!("Making ID converter request");
        let response: IdConvResponse = self
            .transport
            .get_json(&url, &self.config.open_access_retry_config, "ID converter")
            .await?;

        if let Some(status) = response.status.as_deref().filter(|s| *s != "ok") {
            warn!(status, "ID converter reported a non-ok status");
        }

        Ok(records_to_map(response.records))
    }
}

/// Records without a PMID are dropped; a blank PMC id counts as "not in PMC"
fn records_to_map(records: Vec<IdConvRecord>) -> OpenAccessMap {
    records
        .into_iter()
        .filter_map(|record| {
            let pmid = record.pmid?;
            if let Some(status) = record.status.as_deref().filter(|s| *s != "ok") {
                debug!(
                    pmid = %pmid,
                    status,
                    errmsg = record.errmsg.as_deref().unwrap_or_default(),
                    "ID converter has no PMC record"
                );
            }
            let pmcid = record.pmcid.filter(|id| !id.trim().is_empty());
            Some((pmid, pmcid))
        })
        .collect()
}

impl Default for PmcClient {
    fn default() -> Self {
        Self::new()
    }
}
