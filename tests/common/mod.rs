// Shared helpers for the HTTP-level tests.
#![allow(dead_code)]

use std::sync::Arc;

use itihas::cache::ResultCache;
use itihas::http::REQUEST_TIMEOUT;
use itihas::wikidata::{RegionRelation, WikidataClient};
use itihas::wikipedia::WikipediaClient;
use serde_json::{json, Value};
use wiremock::{Match, MockServer, Request};

pub const TEST_USER_AGENT: &str = "itihas-tests/0.1 (tests@example.org)";

/// Matches a SPARQL GET whose `query` parameter contains `needle`.
pub struct SparqlContains<S>(pub S);

impl<S: AsRef<str> + Send + Sync> Match for SparqlContains<S> {
    fn matches(&self, request: &Request) -> bool {
        request
            .url
            .query_pairs()
            .any(|(key, value)| key == "query" && value.contains(self.0.as_ref()))
    }
}

pub fn wikidata_client(server: &MockServer, cache: Arc<ResultCache>) -> WikidataClient {
    WikidataClient::new(
        &format!("{}/sparql", server.uri()),
        TEST_USER_AGENT,
        REQUEST_TIMEOUT,
        RegionRelation::Direct,
        cache,
    )
    .unwrap()
}

pub fn wikipedia_client(
    server: &MockServer,
    summary_words: usize,
    cache: Arc<ResultCache>,
) -> WikipediaClient {
    WikipediaClient::new(
        &format!("{}/{{lang}}/w/api.php", server.uri()),
        TEST_USER_AGENT,
        REQUEST_TIMEOUT,
        summary_words,
        500,
        cache,
    )
    .unwrap()
}

pub fn bindings(rows: Vec<Value>) -> Value {
    json!({
        "head": {"vars": []},
        "results": {"bindings": rows}
    })
}

pub fn literal(value: &str) -> Value {
    json!({"type": "literal", "value": value})
}

pub fn event_row(label: &str, description: Option<&str>, date: &str) -> Value {
    let mut row = json!({
        "event": {"type": "uri", "value": "http://www.wikidata.org/entity/Q100"},
        "eventLabel": literal(label),
        "date": {
            "datatype": "http://www.w3.org/2001/XMLSchema#dateTime",
            "type": "literal",
            "value": date
        }
    });
    if let Some(description) = description {
        row["eventDescription"] = literal(description);
    }
    row
}

pub fn extract_page(title: &str, extract: &str) -> Value {
    json!({
        "batchcomplete": true,
        "query": {"pages": [{"pageid": 1, "ns": 0, "title": title, "extract": extract}]}
    })
}

pub fn thumbnail_page(title: &str, source: &str) -> Value {
    json!({
        "batchcomplete": true,
        "query": {"pages": [{
            "pageid": 1,
            "ns": 0,
            "title": title,
            "thumbnail": {"source": source, "width": 500, "height": 375},
            "pageimage": "Example.jpg"
        }]}
    })
}
