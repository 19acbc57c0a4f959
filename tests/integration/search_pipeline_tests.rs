//! End-to-end search pipeline tests using mocked NCBI endpoints
//!
//! ESearch, EFetch and the ID converter are all served by one wiremock server.

mod common;

use common::{article_set, article_xml, esearch_json, idconv_json, mock_config};
use pubmed_citations::{Client, PubMedError, ResultKind, SearchQuery, SortOrder};
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_esearch(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_efetch(server: &MockServer, body: String) {
    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/xml"),
        )
        .mount(server)
        .await;
}

async fn mount_idconv(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/idconv/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
#[traced_test]
async fn test_search_full_pipeline() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("db", "pubmed"))
        .and(query_param("term", "(asthma) AND 2020:3000[pdat]"))
        .and(query_param("retmax", "3"))
        .and(query_param("retmode", "json"))
        .and(query_param("sort", "pub_date"))
        .and(query_param("email", "test@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_json(
            &["300", "100", "200"],
            1520,
            Some("\"asthma\"[MeSH Terms] AND 2020:3000[pdat]"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    // EFetch returns records in its own order
    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("id", "300,100,200"))
        .and(query_param("rettype", "xml"))
        .and(query_param("retmode", "xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_set(&[
            article_xml("100", "First <i>asthma</i> study", &["Smith"], "2021"),
            article_xml("200", "Second study", &["Jones", "Lee"], "2022"),
            article_xml("300", "Third study", &["Kim", "Park", "Chen"], "2023"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/idconv/"))
        .and(query_param("ids", "300,100,200"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(idconv_json(&[
            ("300", None),
            ("100", Some("PMC100")),
            ("200", None),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::with_config(mock_config(&server));
    let query = SearchQuery::new("asthma")
        .year_from(2020)
        .sort(SortOrder::Date)
        .max_results(3);

    let result = client.search(&query).await.expect("Search should succeed");

    assert_eq!(result.kind, ResultKind::PubMed);
    assert_eq!(result.total_count, 1520);
    assert_eq!(
        result.query_translation.as_deref(),
        Some("\"asthma\"[MeSH Terms] AND 2020:3000[pdat]")
    );

    let pmids: Vec<&str> = result.articles.iter().map(|a| a.pmid.as_str()).collect();
    assert_eq!(pmids, vec!["300", "100", "200"], "ESearch order must be kept");

    let third = &result.articles[0];
    assert_eq!(third.authors, "Kim A et al.");
    assert_eq!(third.journal, "J Ex. 2023. 10(3)");
    assert!(!third.free_full_text);
    assert_eq!(third.url, "https://pubmed.ncbi.nlm.nih.gov/300/");

    let first = &result.articles[1];
    assert_eq!(first.title, "First asthma study");
    assert_eq!(first.authors, "Smith A");
    assert_eq!(first.abstract_text, "Abstract for 100.");
    assert_eq!(first.doi.as_deref(), Some("10.1000/ex.100"));
    assert_eq!(first.pmc_id.as_deref(), Some("PMC100"));
    assert!(first.free_full_text);

    assert_eq!(result.articles[2].authors, "Jones A, Lee A");
}

#[tokio::test]
#[traced_test]
async fn test_search_without_matches_skips_fetch() {
    let server = MockServer::start().await;
    mount_esearch(&server, esearch_json(&[], 0, Some("nothing[All Fields]"))).await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/idconv/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = Client::with_config(mock_config(&server));
    let result = client
        .search(&SearchQuery::new("nothing"))
        .await
        .expect("Empty result is not an error");

    assert!(result.articles.is_empty());
    assert_eq!(result.total_count, 0);
    assert_eq!(result.query_translation.as_deref(), Some("nothing[All Fields]"));
}

#[tokio::test]
#[traced_test]
async fn test_empty_term_makes_no_requests() {
    let server = MockServer::start().await;
    let client = Client::with_config(mock_config(&server));

    let result = client.search(&SearchQuery::new("  ")).await.unwrap();
    assert!(result.articles.is_empty());

    let received = server.received_requests().await.unwrap();
    assert!(received.is_empty(), "No HTTP requests for an empty term");
}

#[tokio::test]
#[traced_test]
async fn test_default_max_results_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("retmax", "5"))
        .and(query_param("sort", "relevance"))
        .and(query_param("term", "copd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_json(&[], 0, None)))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::with_config(mock_config(&server));
    client.search(&SearchQuery::new("copd")).await.unwrap();
}

#[tokio::test]
#[traced_test]
async fn test_unparsed_records_are_omitted() {
    let server = MockServer::start().await;
    mount_esearch(&server, esearch_json(&["1", "2", "3"], 3, None)).await;

    let broken = "<PubmedArticle><MedlineCitation><PMID>2</PMID><Article></MedlineCitation></PubmedArticle>".to_string();
    mount_efetch(
        &server,
        article_set(&[
            article_xml("1", "One", &["A"], "2020"),
            broken,
            article_xml("3", "Three", &["C"], "2020"),
        ]),
    )
    .await;
    mount_idconv(&server, idconv_json(&[("1", None), ("2", None), ("3", None)])).await;

    let client = Client::with_config(mock_config(&server));
    let result = client.search(&SearchQuery::new("test")).await.unwrap();

    let pmids: Vec<&str> = result.articles.iter().map(|a| a.pmid.as_str()).collect();
    assert_eq!(pmids, vec!["1", "3"]);
    assert_eq!(result.total_count, 3);
}

#[tokio::test]
#[traced_test]
async fn test_esearch_error_field_fails_search() {
    let server = MockServer::start().await;
    mount_esearch(
        &server,
        serde_json::json!({"esearchresult": {"ERROR": "Invalid query syntax"}}),
    )
    .await;

    let client = Client::with_config(mock_config(&server));
    let err = client.search(&SearchQuery::new("((")).await.unwrap_err();

    match err {
        PubMedError::ApiError { status, message } => {
            assert_eq!(status, 200);
            assert!(message.contains("Invalid query syntax"));
        }
        other => panic!("Expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
#[traced_test]
async fn test_esearch_warnings_are_reported() {
    let server = MockServer::start().await;

    let mut body = esearch_json(&[], 0, None);
    body["esearchresult"]["warninglist"] = serde_json::json!({
        "phrasesignored": ["the"],
        "quotedphrasesnotfound": [],
        "outputmessages": ["No items found."]
    });
    body["esearchresult"]["errorlist"] = serde_json::json!({
        "phrasesnotfound": ["xyzzyplugh"],
        "fieldsnotfound": []
    });
    mount_esearch(&server, body).await;

    let client = Client::with_config(mock_config(&server));
    let found = client
        .pubmed
        .search_ids(&SearchQuery::new("the xyzzyplugh"))
        .await
        .unwrap();

    assert!(found.ids.is_empty());
    assert_eq!(found.errors, vec!["phrasesnotfound: xyzzyplugh"]);
    assert_eq!(
        found.warnings,
        vec!["outputmessages: No items found.", "phrasesignored: the"]
    );
}

#[tokio::test]
#[traced_test]
async fn test_efetch_failure_fails_search() {
    let server = MockServer::start().await;
    mount_esearch(&server, esearch_json(&["1"], 1, None)).await;
    mount_idconv(&server, idconv_json(&[("1", Some("PMC1"))])).await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::with_config(mock_config(&server));
    let err = client.search(&SearchQuery::new("test")).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}
