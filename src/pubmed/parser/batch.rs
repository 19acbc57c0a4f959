use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info, instrument, warn};

use super::parse_article_block;
use crate::pubmed::models::PubMedArticle;

fn article_block_regex() -> &'static Regex {
    static ARTICLE_BLOCK_REGEX: OnceLock<Regex> = OnceLock::new();
    ARTICLE_BLOCK_REGEX.get_or_init(|| {
        Regex::new(r"(?s)<PubmedArticle\b[^>]*>.*?</PubmedArticle>")
            .expect("Failed to compile article block regex")
    })
}

/// Split an EFetch response into its `<PubmedArticle>...</PubmedArticle>` blocks
///
/// Anything between blocks (XML declaration, DOCTYPE, `<PubmedArticleSet>`,
/// `<PubmedBookArticle>` records) is ignored.
pub fn split_article_blocks(xml: &str) -> Vec<&str> {
    article_block_regex()
        .find_iter(xml)
        .map(|m| m.as_str())
        .collect()
}

/// Parse every `<PubmedArticle>` in an EFetch XML response
///
/// Blocks without a PMID and blocks that fail to parse are skipped, so the
/// result may be shorter than the number of records in the response. The
/// output keeps the order of the blocks in the document.
///
/// # Example
///
/// ```
/// use pubmed_citations::pubmed::parser::parse_articles_from_xml;
///
/// let xml = r#"<?xml version="1.0"?>
/// <PubmedArticleSet>
///   <PubmedArticle><MedlineCitation><PMID>1</PMID></MedlineCitation></PubmedArticle>
///   <PubmedArticle><MedlineCitation><PMID>2</PMID></MedlineCitation></PubmedArticle>
/// </PubmedArticleSet>"#;
///
/// let articles = parse_articles_from_xml(xml);
/// assert_eq!(articles.len(), 2);
/// assert_eq!(articles[0].pmid, "1");
/// ```
#[instrument(skip(xml), fields(xml_size = xml.len()))]
pub fn parse_articles_from_xml(xml: &str) -> Vec<PubMedArticle> {
    let blocks = split_article_blocks(xml);
    let total = blocks.len();

    let articles: Vec<PubMedArticle> = blocks
        .into_iter()
        .enumerate()
        .filter_map(|(index, block)| match parse_article_block(block) {
            Ok(Some(article)) => Some(article),
            Ok(None) => {
                debug!(index, "Skipping article block without PMID");
                None
            }
            Err(e) => {
                warn!(index, error = %e, "Failed to parse article block, skipping");
                None
            }
        })
        .collect();

    info!(
        blocks = total,
        parsed = articles.len(),
        "Parsed articles from EFetch response"
    );
    articles
}
