//! PubMed client for searching and fetching article metadata
//!
//! This module provides functionality to interact with the ESearch and EFetch
//! E-utilities and to turn EFetch XML into [`PubMedArticle`] records.

pub mod client;
pub mod models;
pub mod parser;
pub mod query;
pub(crate) mod responses;

// Re-export public types
pub use client::{MAX_RETRIEVABLE, PubMedClient, SearchIds};
pub use models::{Author, Journal, PubDate, PubMedArticle};
pub use parser::parse_articles_from_xml;
pub use query::{SearchQuery, SortOrder};
