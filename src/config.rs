//! Client configuration
//!
//! All values are supplied explicitly by the caller. The library never reads
//! environment variables; the CLI maps its flags and environment onto this type.

use std::time::Duration;

use crate::retry::RetryConfig;

/// Default NCBI E-utilities endpoint
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Default PMC ID converter endpoint
pub const DEFAULT_IDCONV_URL: &str = "https://www.ncbi.nlm.nih.gov/pmc/utils/idconv/v1.0/";

/// Default tool identifier reported to NCBI
pub const DEFAULT_TOOL: &str = "pubmed-citations";

/// Configuration shared by [`crate::PubMedClient`] and [`crate::PmcClient`]
///
/// # Example
///
/// ```
/// use pubmed_citations::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new()
///     .with_api_key("your_api_key_here")
///     .with_email("clinician@hospital.example")
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.default_max_results, 5);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// E-utilities base URL (ESearch and EFetch live below it)
    pub base_url: String,
    /// ID converter endpoint used for open-access lookups
    pub idconv_url: String,
    /// NCBI API key; raises the upstream rate limit, passed through untouched
    pub api_key: Option<String>,
    /// Contact email required by NCBI usage policy
    pub email: Option<String>,
    /// Tool name required by NCBI usage policy
    pub tool: String,
    /// Per-attempt request timeout
    pub timeout: Duration,
    /// Result cap used when a query does not set one
    pub default_max_results: usize,
    /// Retry policy for ESearch and EFetch
    pub retry_config: RetryConfig,
    /// Retry policy for the open-access lookup
    pub open_access_retry_config: RetryConfig,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            idconv_url: DEFAULT_IDCONV_URL.to_string(),
            api_key: None,
            email: None,
            tool: DEFAULT_TOOL.to_string(),
            timeout: Duration::from_millis(10_000),
            default_max_results: 5,
            retry_config: RetryConfig::default(),
            open_access_retry_config: RetryConfig::open_access(),
        }
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_idconv_url<S: Into<String>>(mut self, idconv_url: S) -> Self {
        self.idconv_url = idconv_url.into();
        self
    }

    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_tool<S: Into<String>>(mut self, tool: S) -> Self {
        self.tool = tool.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_default_max_results(mut self, max_results: usize) -> Self {
        self.default_max_results = max_results;
        self
    }

    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    pub fn with_open_access_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.open_access_retry_config = retry_config;
        self
    }

    /// Base URL without a trailing slash
    pub(crate) fn effective_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub(crate) fn effective_user_agent(&self) -> String {
        format!("{}/{}", self.tool, env!("CARGO_PKG_VERSION"))
    }

    /// `tool`, `email` and `api_key` parameters for E-utilities requests
    pub(crate) fn build_api_params(&self) -> Vec<(String, String)> {
        let mut params = self.build_contact_params();
        if let Some(api_key) = &self.api_key {
            params.push(("api_key".to_string(), api_key.clone()));
        }
        params
    }

    /// `tool` and `email` only; the ID converter takes no API key
    pub(crate) fn build_contact_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("tool".to_string(), self.tool.clone())];
        if let Some(email) = &self.email {
            params.push(("email".to_string(), email.clone()));
        }
        params
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
