//! HTTP transport shared by the PubMed and PMC clients
//!
//! Wraps a `reqwest::Client` with a hard per-attempt timeout, maps non-success
//! statuses to [`PubMedError::ApiError`] and runs every call through the retry
//! policy it is given.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{PubMedError, Result};
use crate::retry::{RetryConfig, with_retry};

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Build a transport whose underlying client honours `config.timeout`
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .user_agent(config.effective_user_agent())
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            timeout: config.timeout,
        }
    }

    /// Use a caller-supplied `reqwest::Client`; `timeout` still bounds every attempt
    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// GET `url` and hand the successful response to `parse`, retrying per `retry`
    ///
    /// `parse` runs inside the retried operation, so a body that times out while
    /// streaming is retried like any other timeout. Parse failures are permanent.
    pub async fn get_with_retry<T, P, Fut>(
        &self,
        url: &str,
        retry: &RetryConfig,
        label: &str,
        parse: P,
    ) -> Result<T>
    where
        P: Fn(Response) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let parse = &parse;
        with_retry(
            move || async move {
                let attempt = async {
                    let response = self.send(url).await?;
                    parse(response).await
                };

                match tokio::time::timeout(self.timeout, attempt).await {
                    Ok(result) => result,
                    Err(_) => Err(PubMedError::Timeout {
                        label: label.to_string(),
                    }),
                }
            },
            retry,
            label,
        )
        .await
    }

    /// GET `url` and return the body as text
    pub async fn get_text(&self, url: &str, retry: &RetryConfig, label: &str) -> Result<String> {
        self.get_with_retry(url, retry, label, |response: Response| async move {
            Ok::<_, PubMedError>(response.text().await?)
        })
        .await
    }

    /// GET `url` and deserialize the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        retry: &RetryConfig,
        label: &str,
    ) -> Result<T> {
        self.get_with_retry(url, retry, label, |response: Response| async move {
            let body = response.text().await?;
            Ok::<_, PubMedError>(serde_json::from_str::<T>(&body)?)
        })
        .await
    }

    async fn send(&self, url: &str) -> Result<Response> {
        debug!("Making API request to: {url}");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PubMedError::ApiError {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            });
        }

        Ok(response)
    }
}

/// Append url-encoded `params` to `base`
pub(crate) fn build_url(base: &str, params: &[(String, String)]) -> String {
    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    if query.is_empty() {
        return base.to_string();
    }

    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}{query}")
}
