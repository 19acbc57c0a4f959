//! PMC (PubMed Central) open-access lookup
//!
//! Maps PMIDs to PMC identifiers through the NCBI ID converter. The lookup is
//! best-effort: it never fails the search it belongs to.

pub mod client;
pub(crate) mod deserializers;

pub use client::{OpenAccessMap, PmcClient};
