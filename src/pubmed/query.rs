//! Search query definition and PubMed term construction

use serde::{Deserialize, Serialize};

/// Lower bound used when only an upper publication year is given
const EARLIEST_YEAR: u32 = 1800;
/// Upper bound used when only a lower publication year is given
const LATEST_YEAR: u32 = 3000;

/// Result ordering requested from ESearch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Best match first
    #[default]
    Relevance,
    /// Most recent publication first
    Date,
}

impl SortOrder {
    /// Value of the ESearch `sort` parameter
    pub fn as_api_param(&self) -> &'static str {
        match self {
            SortOrder::Relevance => "relevance",
            SortOrder::Date => "pub_date",
        }
    }
}

/// A PubMed search request
///
/// The client only reads it; filters are rendered into the outgoing term by
/// [`SearchQuery::build_term`].
///
/// # Example
///
/// ```
/// use pubmed_citations::{SearchQuery, SortOrder};
///
/// let query = SearchQuery::new("heart failure sglt2")
///     .year_from(2020)
///     .free_full_text_only()
///     .sort(SortOrder::Date)
///     .max_results(10);
///
/// assert_eq!(
///     query.build_term(),
///     "(heart failure sglt2) AND 2020:3000[pdat] AND free full text[sb]"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub term: String,
    #[serde(default)]
    pub year_from: Option<u32>,
    #[serde(default)]
    pub year_to: Option<u32>,
    #[serde(default)]
    pub free_full_text_only: bool,
    #[serde(default)]
    pub sort: SortOrder,
    #[serde(default)]
    pub max_results: Option<usize>,
}

impl SearchQuery {
    pub fn new<S: Into<String>>(term: S) -> Self {
        Self {
            term: term.into(),
            ..Self::default()
        }
    }

    /// Only articles published in or after `year`
    pub fn year_from(mut self, year: u32) -> Self {
        self.year_from = Some(year);
        self
    }

    /// Only articles published in or before `year`
    pub fn year_to(mut self, year: u32) -> Self {
        self.year_to = Some(year);
        self
    }

    /// Restrict to articles with free full text
    pub fn free_full_text_only(mut self) -> Self {
        self.free_full_text_only = true;
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Publication-date clause, if any bound is set
    fn date_filter(&self) -> Option<String> {
        match (self.year_from, self.year_to) {
            (None, None) => None,
            (from, to) => Some(format!(
                "{}:{}[pdat]",
                from.unwrap_or(EARLIEST_YEAR),
                to.unwrap_or(LATEST_YEAR)
            )),
        }
    }

    /// Term sent to ESearch: the raw text plus date and free-full-text clauses
    pub fn build_term(&self) -> String {
        let term = self.term.trim();
        let mut filters = Vec::new();

        if let Some(date) = self.date_filter() {
            filters.push(date);
        }
        if self.free_full_text_only {
            filters.push("free full text[sb]".to_string());
        }

        if filters.is_empty() {
            return term.to_string();
        }

        format!("({}) AND {}", term, filters.join(" AND "))
    }
}
