//! Type definitions for the Wikidata module.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_SPARQL_ENDPOINT: &str = "https://query.wikidata.org/sparql";

/// "historical event"; subclasses are matched through `wdt:P279*`.
pub const HISTORICAL_EVENT_CLASS: &str = "Q198";

pub const ON_THIS_DAY_LIMIT: usize = 5;
pub const TIMELINE_LIMIT: usize = 25;

/// SPARQL JSON results document (`application/sparql-results+json`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SparqlResponse {
    #[serde(default)]
    pub results: SparqlResults,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub bindings: Vec<SparqlBinding>,
}

pub type SparqlBinding = HashMap<String, SparqlValue>;

#[derive(Debug, Clone, Deserialize)]
pub struct SparqlValue {
    pub value: String,
}

/// Label, description and article title of one entity in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDetails {
    pub label: String,
    pub description: Option<String>,
    /// Empty exactly when the entity has no article in the requested language.
    pub page_title: String,
}

impl EntityDetails {
    pub fn has_article(&self) -> bool {
        !self.page_title.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnThisDayEvent {
    pub label: String,
    pub description: Option<String>,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub label: String,
    pub description: Option<String>,
    pub date: NaiveDate,
}

impl TimelineEvent {
    pub fn formatted_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}
