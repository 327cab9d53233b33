//! SPARQL query construction.
//!
//! Queries are fixed templates with `%slot%` placeholders. Slots are only
//! filled through typed binders, so nothing but validated identifiers,
//! language codes and integers ever reaches the query text.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use super::types::{HISTORICAL_EVENT_CLASS, ON_THIS_DAY_LIMIT, TIMELINE_LIMIT};
use crate::common::{EntityId, LanguageCode};

const ENTITY_DETAILS_TEMPLATE: &str = r#"
SELECT ?label ?description ?article WHERE {
  BIND(%entity% AS ?item)
  ?item rdfs:label ?label .
  FILTER(LANG(?label) = %lang%)
  OPTIONAL {
    ?item schema:description ?description .
    FILTER(LANG(?description) = %lang%)
  }
  OPTIONAL {
    ?article schema:about ?item ;
             schema:inLanguage %lang% ;
             schema:isPartOf %wiki% .
  }
}
LIMIT 1
"#;

const EVENTS_TEMPLATE: &str = r#"
SELECT ?event ?eventLabel ?eventDescription ?date WHERE {
  ?event wdt:P31/wdt:P279* %class% .
  %containment%
  ?event wdt:P585 ?date .
  %date_filter%
  SERVICE wikibase:label { bd:serviceParam wikibase:language %label_languages% . }
}
ORDER BY ?date
LIMIT %limit%
"#;

/// How an event is tied to the region it happened in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionRelation {
    /// `?event wdt:P131 ?region`, truthy "located in" statements only.
    #[default]
    Direct,
    /// `?event p:P131/ps:P131 ?region`, any rank of "located in" statement.
    StatementNode,
    /// `?event wdt:P131+ ?region`, also events located in sub-regions.
    Transitive,
}

impl RegionRelation {
    fn fragment(&self, region: &EntityId) -> String {
        match self {
            RegionRelation::Direct => format!("?event wdt:P131 wd:{} .", region),
            RegionRelation::StatementNode => {
                format!("?event p:P131 ?located .\n  ?located ps:P131 wd:{} .", region)
            }
            RegionRelation::Transitive => format!("?event wdt:P131+ wd:{} .", region),
        }
    }
}

impl fmt::Display for RegionRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionRelation::Direct => write!(f, "direct"),
            RegionRelation::StatementNode => write!(f, "statement_node"),
            RegionRelation::Transitive => write!(f, "transitive"),
        }
    }
}

impl FromStr for RegionRelation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "direct" => Ok(RegionRelation::Direct),
            "statement_node" | "statement" => Ok(RegionRelation::StatementNode),
            "transitive" => Ok(RegionRelation::Transitive),
            other => bail!("Unknown region relation: {}", other),
        }
    }
}

/// A query template plus the values bound to its slots.
pub struct QueryTemplate {
    text: &'static str,
    bindings: Vec<(&'static str, String)>,
}

impl QueryTemplate {
    pub fn new(text: &'static str) -> Self {
        Self {
            text,
            bindings: Vec::new(),
        }
    }

    pub fn entity(mut self, slot: &'static str, id: &EntityId) -> Self {
        self.bindings.push((slot, format!("wd:{}", id)));
        self
    }

    /// Binds a language code as a plain string literal.
    pub fn language(mut self, slot: &'static str, lang: &LanguageCode) -> Self {
        self.bindings.push((slot, format!("\"{}\"", lang)));
        self
    }

    /// Binds a comma-separated language list literal for the label service.
    pub fn language_list(mut self, slot: &'static str, langs: &[&LanguageCode]) -> Self {
        let joined = langs
            .iter()
            .map(|l| l.as_str())
            .collect::<Vec<_>>()
            .join(",");
        self.bindings.push((slot, format!("\"{}\"", joined)));
        self
    }

    pub fn iri(mut self, slot: &'static str, iri: &Url) -> Self {
        self.bindings.push((slot, format!("<{}>", iri)));
        self
    }

    pub fn integer(mut self, slot: &'static str, value: usize) -> Self {
        self.bindings.push((slot, value.to_string()));
        self
    }

    /// Binds a fragment generated inside this module.
    fn fragment(mut self, slot: &'static str, fragment: String) -> Self {
        self.bindings.push((slot, fragment));
        self
    }

    pub fn render(self) -> Result<String> {
        let mut query = self.text.to_string();
        for (slot, value) in &self.bindings {
            let placeholder = format!("%{}%", slot);
            if !query.contains(&placeholder) {
                bail!("Query template has no slot named {}", slot);
            }
            query = query.replace(&placeholder, value);
        }

        if let Some(start) = query.find('%') {
            let rest = &query[start + 1..];
            let slot = rest.split('%').next().unwrap_or(rest);
            bail!("Query slot {} was never bound", slot);
        }

        Ok(query)
    }
}

fn wiki_iri(lang: &LanguageCode) -> Result<Url> {
    Url::parse(&format!("https://{}.wikipedia.org/", lang))
        .with_context(|| format!("Failed to build wiki IRI for language {}", lang))
}

pub fn entity_details(entity: &EntityId, lang: &LanguageCode) -> Result<String> {
    QueryTemplate::new(ENTITY_DETAILS_TEMPLATE)
        .entity("entity", entity)
        .language("lang", lang)
        .iri("wiki", &wiki_iri(lang)?)
        .render()
}

fn events(
    region: &EntityId,
    lang: &LanguageCode,
    relation: RegionRelation,
    date_filter: String,
    limit: usize,
) -> Result<String> {
    let fallback = LanguageCode::english();
    let class = EntityId::parse(HISTORICAL_EVENT_CLASS)?;

    QueryTemplate::new(EVENTS_TEMPLATE)
        .entity("class", &class)
        .fragment("containment", relation.fragment(region))
        .fragment("date_filter", date_filter)
        .language_list("label_languages", &[lang, &fallback])
        .integer("limit", limit)
        .render()
}

/// Events in `region` whose date falls on `month`/`day` of any year.
pub fn events_on_date(
    region: &EntityId,
    lang: &LanguageCode,
    relation: RegionRelation,
    month: u32,
    day: u32,
) -> Result<String> {
    events(
        region,
        lang,
        relation,
        format!("FILTER(MONTH(?date) = {} && DAY(?date) = {})", month, day),
        ON_THIS_DAY_LIMIT,
    )
}

pub fn timeline(region: &EntityId, lang: &LanguageCode, relation: RegionRelation) -> Result<String> {
    events(region, lang, relation, String::new(), TIMELINE_LIMIT)
}
