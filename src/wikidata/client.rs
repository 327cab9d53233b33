//! Wikidata query service client.

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use reqwest::header;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::parser::{parse_entity_details, parse_on_this_day, parse_timeline};
use super::query::{self, RegionRelation};
use super::types::{EntityDetails, OnThisDayEvent, SparqlResponse, TimelineEvent};
use crate::cache::{CacheKey, ResultCache};
use crate::common::{EntityId, LanguageCode};
use crate::environment::Settings;
use crate::http::create_http_client;
use crate::lookup::{EmptyReason, Lookup};
use crate::TARGET_WEB_REQUEST;

pub struct WikidataClient {
    http: reqwest::Client,
    endpoint: String,
    relation: RegionRelation,
    cache: Arc<ResultCache>,
}

impl WikidataClient {
    pub fn new(
        endpoint: &str,
        user_agent: &str,
        request_timeout: Duration,
        relation: RegionRelation,
        cache: Arc<ResultCache>,
    ) -> Result<Self> {
        Ok(Self {
            http: create_http_client(user_agent, request_timeout)?,
            endpoint: endpoint.to_string(),
            relation,
            cache,
        })
    }

    pub fn from_settings(settings: &Settings, cache: Arc<ResultCache>) -> Result<Self> {
        Self::new(
            &settings.sparql_endpoint,
            &settings.user_agent,
            settings.request_timeout,
            settings.region_relation,
            cache,
        )
    }

    pub fn region_relation(&self) -> RegionRelation {
        self.relation
    }

    /// Runs one SPARQL query and returns the parsed JSON result table.
    pub async fn run_query(&self, sparql: &str) -> Result<SparqlResponse> {
        debug!(target: TARGET_WEB_REQUEST, "Running SPARQL query against {}: {}", self.endpoint, sparql);

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("query", sparql), ("format", "json")])
            .header(header::ACCEPT, "application/sparql-results+json")
            .send()
            .await
            .context("SPARQL request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("SPARQL endpoint returned status {}", status);
        }

        let parsed: SparqlResponse = response
            .json()
            .await
            .context("Failed to parse SPARQL response")?;
        debug!(target: TARGET_WEB_REQUEST, "SPARQL query returned {} rows", parsed.results.bindings.len());
        Ok(parsed)
    }

    async fn run_built_query(&self, built: Result<String>) -> Result<SparqlResponse> {
        let sparql = built?;
        self.run_query(&sparql).await
    }

    /// Label, description and article title of `entity` in `language`.
    ///
    /// An entity without a label in that language is `Empty(NoMatch)`, never a
    /// partially filled record.
    pub async fn fetch_entity_details(
        &self,
        entity: &EntityId,
        language: &LanguageCode,
    ) -> Lookup<EntityDetails> {
        let key = CacheKey::new("fetch_entity_details", [entity.as_str(), language.as_str()]);
        self.cache
            .get_or_fetch(key, move || async move {
                let result = self
                    .run_built_query(query::entity_details(entity, language))
                    .await;

                match result {
                    Ok(response) => match parse_entity_details(&response) {
                        Some(details) => Lookup::Found(details),
                        None => {
                            info!(target: TARGET_WEB_REQUEST, "No {} label for entity {}", language, entity);
                            Lookup::Empty(EmptyReason::NoMatch)
                        }
                    },
                    Err(err) => {
                        error!(target: TARGET_WEB_REQUEST, "Entity lookup for {} ({}) failed: {:#}", entity, language, err);
                        Lookup::from(err)
                    }
                }
            })
            .await
    }

    /// Historical events in `region` whose date falls on `month`/`day` of any
    /// year. No match is an empty list.
    pub async fn fetch_events_on_date(
        &self,
        region: &EntityId,
        language: &LanguageCode,
        month: u32,
        day: u32,
    ) -> Lookup<Vec<OnThisDayEvent>> {
        // 2000 is a leap year, so 02-29 is accepted.
        if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
            warn!(target: TARGET_WEB_REQUEST, "Ignoring impossible calendar day {:02}-{:02}", month, day);
            return Lookup::Found(Vec::new());
        }

        let key = CacheKey::new(
            "fetch_events_on_date",
            [
                region.to_string(),
                language.to_string(),
                self.relation.to_string(),
                month.to_string(),
                day.to_string(),
            ],
        );
        self.cache
            .get_or_fetch(key, move || async move {
                let result = self
                    .run_built_query(query::events_on_date(
                        region,
                        language,
                        self.relation,
                        month,
                        day,
                    ))
                    .await;

                match result {
                    Ok(response) => Lookup::Found(parse_on_this_day(&response)),
                    Err(err) => {
                        error!(target: TARGET_WEB_REQUEST, "On-this-day lookup for {} failed: {:#}", region, err);
                        Lookup::from(err)
                    }
                }
            })
            .await
    }

    /// `fetch_events_on_date` for the current local calendar day.
    pub async fn fetch_events_today(
        &self,
        region: &EntityId,
        language: &LanguageCode,
    ) -> Lookup<Vec<OnThisDayEvent>> {
        let today = Local::now().date_naive();
        self.fetch_events_on_date(region, language, today.month(), today.day())
            .await
    }

    /// Dated historical events in `region`, oldest first.
    pub async fn fetch_timeline(
        &self,
        region: &EntityId,
        language: &LanguageCode,
    ) -> Lookup<Vec<TimelineEvent>> {
        let key = CacheKey::new(
            "fetch_timeline",
            [
                region.to_string(),
                language.to_string(),
                self.relation.to_string(),
            ],
        );
        self.cache
            .get_or_fetch(key, move || async move {
                let result = self
                    .run_built_query(query::timeline(region, language, self.relation))
                    .await;

                match result {
                    Ok(response) => {
                        let events = parse_timeline(&response);
                        info!(target: TARGET_WEB_REQUEST, "Timeline for {} has {} events", region, events.len());
                        Lookup::Found(events)
                    }
                    Err(err) => {
                        error!(target: TARGET_WEB_REQUEST, "Timeline lookup for {} failed: {:#}", region, err);
                        Lookup::from(err)
                    }
                }
            })
            .await
    }
}
