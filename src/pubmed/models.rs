use serde::{Deserialize, Serialize};

/// Author of a PubMed article
///
/// Only authors with a last name are kept by the parser; collective names are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub last_name: String,
    /// Given name(s), empty when not provided
    #[serde(default)]
    pub fore_name: String,
    /// Initials, empty when not provided
    #[serde(default)]
    pub initials: String,
    /// First listed affiliation
    #[serde(default)]
    pub affiliation: Option<String>,
}

impl Author {
    pub fn new<S: Into<String>>(last_name: S) -> Self {
        Self {
            last_name: last_name.into(),
            fore_name: String::new(),
            initials: String::new(),
            affiliation: None,
        }
    }

    pub fn with_initials<S: Into<String>>(mut self, initials: S) -> Self {
        self.initials = initials.into();
        self
    }

    /// "Last Initials", or just the last name when there are no initials
    pub fn citation_name(&self) -> String {
        if self.initials.is_empty() {
            self.last_name.clone()
        } else {
            format!("{} {}", self.last_name, self.initials)
        }
    }
}

/// Journal issue publication date as printed in the record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PubDate {
    pub year: Option<String>,
    pub month: Option<String>,
    pub day: Option<String>,
}

impl PubDate {
    /// Present parts joined with spaces, e.g. "2023 Mar 15" or "2021"
    pub fn to_display_string(&self) -> String {
        [&self.year, &self.month, &self.day]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journal {
    pub title: Option<String>,
    pub iso_abbreviation: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub pub_date: PubDate,
}

/// Represents a PubMed article parsed from EFetch XML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PubMedArticle {
    /// PubMed ID
    pub pmid: String,
    /// Article title, tags stripped and entities decoded
    pub title: String,
    /// Abstract sections joined with spaces; empty when the record has none
    pub abstract_text: String,
    /// Authors in document order
    pub authors: Vec<Author>,
    pub journal: Journal,
    /// DOI (Digital Object Identifier)
    pub doi: Option<String>,
    /// PMC identifier carried by the record itself
    pub pmc_id: Option<String>,
    /// Publication types (e.g., "Journal Article", "Review")
    pub publication_types: Vec<String>,
    /// MeSH descriptor names; `None` when the record has no MeSH list
    pub mesh_terms: Option<Vec<String>>,
    /// Publication date string, e.g. "2023 Mar 15"
    pub pub_date: String,
    /// Publication year
    pub year: Option<String>,
}
