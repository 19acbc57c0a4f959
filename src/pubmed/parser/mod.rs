//! PubMed XML parser module
//!
//! Turns a PubMed EFetch XML response into [`PubMedArticle`] records. The response
//! is split into `<PubmedArticle>` blocks and each block is parsed on its own, so
//! one malformed record never takes the rest of the batch down with it.
//!
//! # Module Organization
//!
//! - `batch` - block splitting and per-block error isolation
//! - `xml_tree` - small element tree on top of `quick_xml::Reader`
//! - `preprocessing` - text cleaning and entity decoding

mod batch;
mod preprocessing;
mod xml_tree;

pub use batch::{parse_articles_from_xml, split_article_blocks};

use std::sync::OnceLock;

use regex::Regex;
use tracing::instrument;

use crate::error::Result;
use crate::pubmed::models::{Author, Journal, PubDate, PubMedArticle};
use preprocessing::clean_text;
use xml_tree::XmlElement;

/// Title used when a record carries none
pub const UNTITLED: &str = "Untitled";

const ARTICLE: &str = "MedlineCitation/Article";
const PUB_DATE: &str = "MedlineCitation/Article/Journal/JournalIssue/PubDate";

/// Parse a single `<PubmedArticle>` block
///
/// Returns `Ok(None)` when the block has no PMID; such records are discarded.
/// Returns an error when the block is not well-formed XML.
///
/// # Example
///
/// ```
/// use pubmed_citations::pubmed::parser::parse_article_block;
///
/// let block = r#"<PubmedArticle>
///   <MedlineCitation>
///     <PMID>12345678</PMID>
///     <Article>
///       <ArticleTitle>Example Article</ArticleTitle>
///       <Journal><Title>Example Journal</Title></Journal>
///     </Article>
///   </MedlineCitation>
/// </PubmedArticle>"#;
///
/// let article = parse_article_block(block)?.unwrap();
/// assert_eq!(article.title, "Example Article");
/// # Ok::<(), pubmed_citations::PubMedError>(())
/// ```
#[instrument(skip(block), fields(block_size = block.len()))]
pub fn parse_article_block(block: &str) -> Result<Option<PubMedArticle>> {
    let root = XmlElement::parse(block)?;

    let Some(pmid) = text_at(&root, "MedlineCitation/PMID") else {
        return Ok(None);
    };

    let journal = extract_journal(&root);
    // A structured Year wins; otherwise MedlineDate is shown verbatim
    let pub_date = match text_at(&root, &format!("{PUB_DATE}/Year")) {
        Some(_) => journal.pub_date.to_display_string(),
        None => text_at(&root, &format!("{PUB_DATE}/MedlineDate"))
            .unwrap_or_else(|| journal.pub_date.to_display_string()),
    };
    let year = journal.pub_date.year.clone();

    Ok(Some(PubMedArticle {
        pmid,
        title: extract_title(&root),
        abstract_text: extract_abstract(&root),
        authors: extract_authors(&root),
        journal,
        doi: extract_doi(&root),
        pmc_id: article_id(&root, "pmc"),
        publication_types: texts_at(&root, &format!("{ARTICLE}/PublicationTypeList/PublicationType")),
        mesh_terms: extract_mesh_terms(&root),
        pub_date,
        year,
    }))
}

/// Cleaned text of the first element at `path`, if non-empty
fn text_at(element: &XmlElement, path: &str) -> Option<String> {
    element
        .find(path)
        .map(|found| clean_text(&found.text()))
        .filter(|text| !text.is_empty())
}

/// Cleaned, non-empty texts of every element at `path`
fn texts_at(element: &XmlElement, path: &str) -> Vec<String> {
    element
        .find_all(path)
        .into_iter()
        .map(|found| clean_text(&found.text()))
        .filter(|text| !text.is_empty())
        .collect()
}

fn extract_title(root: &XmlElement) -> String {
    text_at(root, &format!("{ARTICLE}/ArticleTitle"))
        .or_else(|| text_at(root, &format!("{ARTICLE}/VernacularTitle")))
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Abstract sections as "Label: text", joined with single spaces
fn extract_abstract(root: &XmlElement) -> String {
    root.find_all(&format!("{ARTICLE}/Abstract/AbstractText"))
        .into_iter()
        .filter_map(|section| {
            let text = clean_text(&section.text());
            if text.is_empty() {
                return None;
            }
            match section.attr("Label").map(clean_text).filter(|l| !l.is_empty()) {
                Some(label) => Some(format!("{label}: {text}")),
                None => Some(text),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

fn extract_authors(root: &XmlElement) -> Vec<Author> {
    root.find_all(&format!("{ARTICLE}/AuthorList/Author"))
        .into_iter()
        .filter_map(|author| {
            let last_name = text_at(author, "LastName")?;
            Some(Author {
                last_name,
                fore_name: text_at(author, "ForeName").unwrap_or_default(),
                initials: text_at(author, "Initials").unwrap_or_default(),
                affiliation: text_at(author, "AffiliationInfo/Affiliation"),
            })
        })
        .collect()
}

fn extract_journal(root: &XmlElement) -> Journal {
    let Some(journal) = root.find(&format!("{ARTICLE}/Journal")) else {
        return Journal::default();
    };

    let pub_date = PubDate {
        year: text_at(journal, "JournalIssue/PubDate/Year").or_else(|| {
            text_at(journal, "JournalIssue/PubDate/MedlineDate")
                .as_deref()
                .and_then(first_year)
        }),
        month: text_at(journal, "JournalIssue/PubDate/Month"),
        day: text_at(journal, "JournalIssue/PubDate/Day"),
    };

    Journal {
        title: text_at(journal, "Title"),
        iso_abbreviation: text_at(journal, "ISOAbbreviation"),
        volume: text_at(journal, "JournalIssue/Volume"),
        issue: text_at(journal, "JournalIssue/Issue"),
        pub_date,
    }
}

/// First four-digit run in a free-form date such as "1998 Dec-1999 Jan"
fn first_year(medline_date: &str) -> Option<String> {
    static YEAR_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = YEAR_REGEX
        .get_or_init(|| Regex::new(r"\b(\d{4})\b").expect("Failed to compile year regex"));
    re.captures(medline_date).map(|caps| caps[1].to_string())
}

/// `PubmedData/ArticleIdList/ArticleId` with the given `IdType`
fn article_id(root: &XmlElement, id_type: &str) -> Option<String> {
    root.find_all("PubmedData/ArticleIdList/ArticleId")
        .into_iter()
        .find(|id| id.attr("IdType") == Some(id_type))
        .map(|id| clean_text(&id.text()))
        .filter(|id| !id.is_empty())
}

fn extract_doi(root: &XmlElement) -> Option<String> {
    article_id(root, "doi").or_else(|| {
        root.find_all(&format!("{ARTICLE}/ELocationID"))
            .into_iter()
            .find(|loc| loc.attr("EIdType") == Some("doi") && loc.attr("ValidYN") != Some("N"))
            .map(|loc| clean_text(&loc.text()))
            .filter(|doi| !doi.is_empty())
    })
}

fn extract_mesh_terms(root: &XmlElement) -> Option<Vec<String>> {
    root.find("MedlineCitation/MeshHeadingList")
        .map(|list| texts_at(list, "MeshHeading/DescriptorName"))
}
