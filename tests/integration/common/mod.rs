//! Shared fixtures for the mocked integration tests
#![allow(dead_code)]

use std::time::Duration;

use pubmed_citations::{ClientConfig, RetryConfig};
use serde_json::{Value, json};
use wiremock::MockServer;

/// Backoff short enough for tests; same attempt counts as production
pub fn fast_retry(max_retries: u32) -> RetryConfig {
    RetryConfig::new(max_retries, Duration::from_millis(5), 2.0)
}

/// Configuration pointing every endpoint at `server`
pub fn mock_config(server: &MockServer) -> ClientConfig {
    ClientConfig::new()
        .with_base_url(server.uri())
        .with_idconv_url(format!("{}/idconv/", server.uri()))
        .with_email("test@example.com")
        .with_tool("pubmed-citations-tests")
        .with_timeout(Duration::from_secs(2))
        .with_retry_config(fast_retry(2))
        .with_open_access_retry_config(fast_retry(1))
}

/// ESearch JSON body listing `pmids`
pub fn esearch_json(pmids: &[&str], total_count: u64, query_translation: Option<&str>) -> Value {
    let mut result = json!({
        "count": total_count.to_string(),
        "retmax": pmids.len().to_string(),
        "retstart": "0",
        "idlist": pmids,
        "translationset": [],
    });
    if let Some(translation) = query_translation {
        result["querytranslation"] = json!(translation);
    }
    json!({
        "header": {"type": "esearch", "version": "0.3"},
        "esearchresult": result,
    })
}

/// ID converter JSON body; `None` means the record has no PMC copy
pub fn idconv_json(records: &[(&str, Option<&str>)]) -> Value {
    let records: Vec<Value> = records
        .iter()
        .map(|(pmid, pmcid)| match pmcid {
            Some(pmcid) => json!({"pmid": pmid, "pmcid": pmcid}),
            None => json!({"pmid": pmid, "status": "error", "errmsg": "Identifier not found in PMC"}),
        })
        .collect();
    json!({
        "status": "ok",
        "responseDate": "2024-05-01 10:00:00",
        "request": "ids=...;format=json",
        "records": records,
    })
}

/// Minimal well-formed `<PubmedArticle>` block
pub fn article_xml(pmid: &str, title: &str, last_names: &[&str], year: &str) -> String {
    let authors: String = last_names
        .iter()
        .map(|last| {
            format!(
                "<Author ValidYN=\"Y\"><LastName>{last}</LastName><ForeName>A</ForeName><Initials>A</Initials></Author>"
            )
        })
        .collect();

    format!(
        r#"<PubmedArticle>
    <MedlineCitation Status="MEDLINE" Owner="NLM">
        <PMID Version="1">{pmid}</PMID>
        <Article PubModel="Print">
            <Journal>
                <JournalIssue CitedMedium="Print">
                    <Volume>10</Volume>
                    <Issue>3</Issue>
                    <PubDate><Year>{year}</Year><Month>Jan</Month></PubDate>
                </JournalIssue>
                <Title>Journal of Examples</Title>
                <ISOAbbreviation>J Ex</ISOAbbreviation>
            </Journal>
            <ArticleTitle>{title}</ArticleTitle>
            <Abstract><AbstractText>Abstract for {pmid}.</AbstractText></Abstract>
            <AuthorList CompleteYN="Y">{authors}</AuthorList>
            <PublicationTypeList><PublicationType UI="D016428">Journal Article</PublicationType></PublicationTypeList>
        </Article>
    </MedlineCitation>
    <PubmedData>
        <ArticleIdList>
            <ArticleId IdType="pubmed">{pmid}</ArticleId>
            <ArticleId IdType="doi">10.1000/ex.{pmid}</ArticleId>
        </ArticleIdList>
    </PubmedData>
</PubmedArticle>"#
    )
}

/// EFetch response wrapping `blocks` in a `<PubmedArticleSet>`
pub fn article_set(blocks: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" ?>\n<!DOCTYPE PubmedArticleSet PUBLIC \"-//NLM//DTD PubMedArticle, 1st January 2024//EN\" \"https://dtd.nlm.nih.gov/ncbi/pubmed/out/pubmed_240101.dtd\">\n<PubmedArticleSet>\n{}\n</PubmedArticleSet>\n",
        blocks.join("\n")
    )
}
