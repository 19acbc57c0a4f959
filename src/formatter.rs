//! Citation-ready output for search results
//!
//! Merges parsed articles with open-access data into the shape consumers read:
//! a tagged [`SearchResult`] holding one [`ArticleResult`] per PMID.

use serde::{Deserialize, Serialize};

use crate::pmc::OpenAccessMap;
use crate::pubmed::models::{Author, Journal, PubMedArticle};

/// Author string used when a record lists no named authors
pub const UNKNOWN_AUTHORS: &str = "Unknown authors";

const PUBMED_URL: &str = "https://pubmed.ncbi.nlm.nih.gov";

/// One formatted article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResult {
    pub pmid: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// e.g. "Smith JA et al."
    pub authors: String,
    /// e.g. "J Clin Med. 2023. 45(2)"
    pub journal: String,
    pub year: Option<String>,
    pub pub_date: String,
    pub doi: Option<String>,
    pub pmc_id: Option<String>,
    pub free_full_text: bool,
    pub url: String,
    pub publication_types: Vec<String>,
    pub mesh_terms: Option<Vec<String>>,
}

/// Result source tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultKind {
    #[default]
    #[serde(rename = "pubmed")]
    PubMed,
}

/// Complete outcome of [`crate::Client::search`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(rename = "type")]
    pub kind: ResultKind,
    /// Articles in ESearch order
    pub articles: Vec<ArticleResult>,
    /// Total matches reported by ESearch, usually more than `articles.len()`
    pub total_count: u64,
    pub query_translation: Option<String>,
}

/// Short author string
///
/// # Example
///
/// ```
/// use pubmed_citations::Author;
/// use pubmed_citations::formatter::format_authors;
///
/// let authors = vec![
///     Author::new("Smith").with_initials("JA"),
///     Author::new("Jones").with_initials("B"),
/// ];
/// assert_eq!(format_authors(&authors), "Smith JA, Jones B");
/// assert_eq!(format_authors(&[]), "Unknown authors");
/// ```
pub fn format_authors(authors: &[Author]) -> String {
    match authors {
        [] => UNKNOWN_AUTHORS.to_string(),
        [only] => only.citation_name(),
        [first, second] => format!("{}, {}", first.citation_name(), second.citation_name()),
        [first, ..] => format!("{} et al.", first.citation_name()),
    }
}

/// Journal citation: name, year and volume(issue) joined with ". "
///
/// The ISO abbreviation is preferred over the full title. Missing parts are left
/// out entirely; an issue is only shown together with a volume.
pub fn format_journal_citation(journal: &Journal, year: Option<&str>) -> String {
    let name = journal
        .iso_abbreviation
        .as_deref()
        .or(journal.title.as_deref())
        .filter(|name| !name.is_empty());

    let volume = journal
        .volume
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|volume| match journal.issue.as_deref().filter(|i| !i.is_empty()) {
            Some(issue) => format!("{volume}({issue})"),
            None => volume.to_string(),
        });

    [
        name.map(str::to_string),
        year.filter(|y| !y.is_empty()).map(str::to_string),
        volume,
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(". ")
}

/// Canonical PubMed page for `pmid`
pub fn article_url(pmid: &str) -> String {
    format!("{PUBMED_URL}/{pmid}/")
}

/// Format a single article; `pmc_id` overrides the one carried by the record
pub fn format_article(article: &PubMedArticle, pmc_id: Option<String>) -> ArticleResult {
    let pmc_id = pmc_id.or_else(|| article.pmc_id.clone());

    ArticleResult {
        pmid: article.pmid.clone(),
        title: article.title.clone(),
        abstract_text: article.abstract_text.clone(),
        authors: format_authors(&article.authors),
        journal: format_journal_citation(&article.journal, article.year.as_deref()),
        year: article.year.clone(),
        pub_date: article.pub_date.clone(),
        doi: article.doi.clone(),
        free_full_text: pmc_id.is_some(),
        pmc_id,
        url: article_url(&article.pmid),
        publication_types: article.publication_types.clone(),
        mesh_terms: article.mesh_terms.clone(),
    }
}

/// Format `articles` in the order of `ids`
///
/// PMIDs with no parsed article are skipped, as are articles whose PMID was not
/// requested.
pub fn format_results(
    ids: &[String],
    articles: &[PubMedArticle],
    open_access: &OpenAccessMap,
) -> Vec<ArticleResult> {
    ids.iter()
        .filter_map(|pmid| {
            let article = articles.iter().find(|article| &article.pmid == pmid)?;
            let pmc_id = open_access.get(pmid).cloned().flatten();
            Some(format_article(article, pmc_id))
        })
        .collect()
}
