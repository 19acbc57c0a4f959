//! Retry behaviour against mocked E-utilities endpoints
//!
//! Server errors and timeouts are retried; client errors are not. Backoff delays
//! are shortened through `RetryConfig`, attempt counts match production.

mod common;

use std::time::Duration;

use common::{article_set, article_xml, esearch_json, fast_retry, mock_config};
use pubmed_citations::{PubMedClient, PubMedError, RetryableError, SearchQuery};
use rstest::rstest;
use tracing_test::traced_test;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
#[traced_test]
async fn test_two_server_errors_then_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_json(&["42"], 1, None)))
        .expect(1)
        .mount(&server)
        .await;

    let client = PubMedClient::with_config(mock_config(&server));
    let found = client
        .search_ids(&SearchQuery::new("retry me"))
        .await
        .expect("Third attempt should succeed");

    assert_eq!(found.ids, vec!["42"]);
}

#[tokio::test]
#[traced_test]
async fn test_persistent_server_error_returns_last_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let client = PubMedClient::with_config(mock_config(&server));
    let err = client
        .search_ids(&SearchQuery::new("always failing"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert!(err.is_retryable());
}

#[rstest]
#[case(400)]
#[case(404)]
#[case(429)]
#[tokio::test]
async fn test_client_errors_are_not_retried(#[case] status: u16) {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(&server)
        .await;

    let client = PubMedClient::with_config(mock_config(&server));
    let err = client.fetch_xml(&["1".to_string()]).await.unwrap_err();

    assert_eq!(err.status(), Some(status));
    assert!(!err.is_retryable());
}

#[tokio::test]
#[traced_test]
async fn test_efetch_recovers_after_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(article_set(&[article_xml("7", "Recovered", &["Doe"], "2024")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = PubMedClient::with_config(mock_config(&server));
    let articles = client.fetch_articles(&["7".to_string()]).await.unwrap();

    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].title, "Recovered");
}

#[tokio::test]
#[traced_test]
async fn test_timeouts_are_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(esearch_json(&["1"], 1, None))
                .set_delay(Duration::from_millis(500)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let config = mock_config(&server)
        .with_timeout(Duration::from_millis(100))
        .with_retry_config(fast_retry(1));
    let client = PubMedClient::with_config(config);

    let err = client
        .search_ids(&SearchQuery::new("slow"))
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "Expected a timeout, got {err:?}");
}

#[tokio::test]
#[traced_test]
async fn test_malformed_json_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = PubMedClient::with_config(mock_config(&server));
    let err = client
        .search_ids(&SearchQuery::new("broken"))
        .await
        .unwrap_err();

    assert!(matches!(err, PubMedError::JsonError(_)));
}
