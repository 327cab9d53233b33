//! Wikidata access for Itihas.
//!
//! Builds SPARQL queries for entity details, "on this day" events and region
//! timelines, runs them against the query service and maps the result tables
//! into typed records.

mod client;
mod parser;
mod query;
mod types;

pub use self::client::WikidataClient;
pub use self::parser::{page_title_from_article, parse_wikidata_date};
pub use self::query::RegionRelation;
pub use self::types::*;
