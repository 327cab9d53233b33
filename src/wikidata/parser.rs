//! Mapping of SPARQL result bindings into typed records.

use chrono::{Datelike, NaiveDate};
use tracing::debug;
use url::Url;

use super::types::{
    EntityDetails, OnThisDayEvent, SparqlBinding, SparqlResponse, TimelineEvent,
    ON_THIS_DAY_LIMIT, TIMELINE_LIMIT,
};
use crate::TARGET_WEB_REQUEST;

fn binding_value<'a>(binding: &'a SparqlBinding, name: &str) -> Option<&'a str> {
    binding
        .get(name)
        .map(|v| v.value.trim())
        .filter(|v| !v.is_empty())
}

/// Parses a Wikidata time value such as `1565-01-23T00:00:00Z` or
/// `-0326-01-01T00:00:00Z` into a calendar date.
pub fn parse_wikidata_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    let date_part = unsigned.split('T').next()?;
    let mut parts = date_part.splitn(3, '-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;

    let year = if negative { -year } else { year };
    // Year-precision values may carry a zero month or day.
    NaiveDate::from_ymd_opt(year, month.max(1), day.max(1))
}

/// Extracts the page title from an article URL such as
/// `https://en.wikipedia.org/wiki/Krishnadevaraya`.
pub fn page_title_from_article(article_url: &str) -> String {
    let segment = match Url::parse(article_url) {
        Ok(url) => url
            .path_segments()
            .and_then(|mut segments| segments.next_back().map(|s| s.to_string()))
            .unwrap_or_default(),
        Err(_) => article_url.rsplit('/').next().unwrap_or_default().to_string(),
    };

    match urlencoding::decode(&segment) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => segment,
    }
}

/// First row of an entity lookup; `None` when the entity has no label in the
/// requested language.
pub fn parse_entity_details(response: &SparqlResponse) -> Option<EntityDetails> {
    let binding = response.results.bindings.first()?;
    let label = binding_value(binding, "label")?;

    Some(EntityDetails {
        label: label.to_string(),
        description: binding_value(binding, "description").map(str::to_string),
        page_title: binding_value(binding, "article")
            .map(page_title_from_article)
            .unwrap_or_default(),
    })
}

struct EventRow {
    label: String,
    description: Option<String>,
    date: NaiveDate,
}

fn parse_event_rows(response: &SparqlResponse) -> Vec<EventRow> {
    let mut rows = Vec::new();
    for binding in &response.results.bindings {
        let Some(label) = binding_value(binding, "eventLabel") else {
            debug!(target: TARGET_WEB_REQUEST, "Skipping event row without label");
            continue;
        };
        let Some(raw_date) = binding_value(binding, "date") else {
            debug!(target: TARGET_WEB_REQUEST, "Skipping event {} without date", label);
            continue;
        };
        let Some(date) = parse_wikidata_date(raw_date) else {
            debug!(target: TARGET_WEB_REQUEST, "Skipping event {} with unparseable date {}", label, raw_date);
            continue;
        };

        rows.push(EventRow {
            label: label.to_string(),
            description: binding_value(binding, "eventDescription").map(str::to_string),
            date,
        });
    }
    rows
}

/// "On this day" rows in service order, capped.
pub fn parse_on_this_day(response: &SparqlResponse) -> Vec<OnThisDayEvent> {
    parse_event_rows(response)
        .into_iter()
        .take(ON_THIS_DAY_LIMIT)
        .map(|row| OnThisDayEvent {
            label: row.label,
            description: row.description,
            year: row.date.year(),
        })
        .collect()
}

/// Timeline rows sorted ascending by date, capped.
pub fn parse_timeline(response: &SparqlResponse) -> Vec<TimelineEvent> {
    let mut events: Vec<TimelineEvent> = parse_event_rows(response)
        .into_iter()
        .map(|row| TimelineEvent {
            label: row.label,
            description: row.description,
            date: row.date,
        })
        .collect();
    events.sort_by_key(|event| event.date);
    events.truncate(TIMELINE_LIMIT);
    events
}
