//! Assembles the dashboard and timeline views from the registry and the two
//! clients.

use anyhow::{anyhow, Result};
use chrono::{Datelike, Local};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::cache::ResultCache;
use crate::TARGET_CACHE;
use crate::common::{EntityId, LanguageCode};
use crate::environment::Settings;
use crate::lookup::Lookup;
use crate::registry::{Language, RegionConfig, Registry};
use crate::wikidata::{EntityDetails, OnThisDayEvent, TimelineEvent, WikidataClient};
use crate::wikipedia::{WikiContent, WikipediaClient};

/// A language and region picked from the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub language: Language,
    pub region: RegionConfig,
}

/// One featured entity: its Wikidata details and, when those were found, its
/// Wikipedia article.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeaturedPanel {
    pub entity_id: EntityId,
    pub details: Lookup<EntityDetails>,
    pub article: Option<Lookup<WikiContent>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub selection: Selection,
    pub month: u32,
    pub day: u32,
    pub featured_figure: FeaturedPanel,
    pub featured_monument: FeaturedPanel,
    pub on_this_day: Lookup<Vec<OnThisDayEvent>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub selection: Selection,
    pub events: Lookup<Vec<TimelineEvent>>,
}

pub struct Explorer {
    registry: Registry,
    wikidata: WikidataClient,
    wikipedia: WikipediaClient,
}

impl Explorer {
    pub fn new(
        registry: Registry,
        wikidata: WikidataClient,
        wikipedia: WikipediaClient,
    ) -> Self {
        Self {
            registry,
            wikidata,
            wikipedia,
        }
    }

    /// Builds the registry, one shared cache and both clients from `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let registry = match &settings.regions_path {
            Some(path) => Registry::load(path)?,
            None => Registry::default(),
        };
        let cache = Arc::new(ResultCache::new(settings.cache_ttl));
        info!(target: TARGET_CACHE, "Caching lookups for {} seconds", cache.ttl().as_secs());
        let wikidata = WikidataClient::from_settings(settings, cache.clone())?;
        let wikipedia = WikipediaClient::from_settings(settings, cache)?;

        Ok(Self::new(registry, wikidata, wikipedia))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Resolves a language and region selection; `None` picks the first entry.
    pub fn select(&self, language: Option<&str>, region: Option<&str>) -> Result<Selection> {
        let language = match language {
            Some(wanted) => self
                .registry
                .language(wanted)
                .ok_or_else(|| anyhow!("Unknown language: {}", wanted))?,
            None => self.registry.default_language(),
        };
        let region = match region {
            Some(wanted) => self
                .registry
                .region(wanted)
                .ok_or_else(|| anyhow!("Unknown region: {}", wanted))?,
            None => self.registry.default_region(),
        };

        Ok(Selection {
            language: language.clone(),
            region: region.clone(),
        })
    }

    async fn featured_panel(&self, entity: &EntityId, language: &LanguageCode) -> FeaturedPanel {
        let details = self.wikidata.fetch_entity_details(entity, language).await;
        let article = match details.found() {
            Some(found) => Some(
                self.wikipedia
                    .fetch_summary_and_image(&found.page_title, language)
                    .await,
            ),
            None => None,
        };

        FeaturedPanel {
            entity_id: entity.clone(),
            details,
            article,
        }
    }

    async fn assemble_dashboard(
        &self,
        selection: &Selection,
        month: u32,
        day: u32,
        on_this_day: Lookup<Vec<OnThisDayEvent>>,
    ) -> Dashboard {
        let language = &selection.language.code;
        let region = &selection.region;
        let featured_figure = self.featured_panel(&region.featured_figure, language).await;
        let featured_monument = self
            .featured_panel(&region.featured_monument, language)
            .await;

        Dashboard {
            selection: selection.clone(),
            month,
            day,
            featured_figure,
            featured_monument,
            on_this_day,
        }
    }

    /// Featured figure, featured monument and the events of `month`/`day`.
    pub async fn dashboard(&self, selection: &Selection, month: u32, day: u32) -> Dashboard {
        let language = &selection.language.code;
        let region = &selection.region;
        info!(
            "Loading dashboard for {} in {} ({:02}-{:02})",
            region.name, language, month, day
        );

        let on_this_day = self
            .wikidata
            .fetch_events_on_date(&region.region_id, language, month, day)
            .await;
        self.assemble_dashboard(selection, month, day, on_this_day)
            .await
    }

    /// Dashboard for the current local calendar day.
    pub async fn dashboard_today(&self, selection: &Selection) -> Dashboard {
        let language = &selection.language.code;
        let region = &selection.region;
        let today = Local::now().date_naive();
        info!("Loading today's dashboard for {} in {}", region.name, language);

        let on_this_day = self
            .wikidata
            .fetch_events_today(&region.region_id, language)
            .await;
        self.assemble_dashboard(selection, today.month(), today.day(), on_this_day)
            .await
    }

    pub async fn timeline(&self, selection: &Selection) -> Timeline {
        info!(
            "Loading timeline for {} in {}",
            selection.region.name, selection.language.code
        );
        let events = self
            .wikidata
            .fetch_timeline(&selection.region.region_id, &selection.language.code)
            .await;

        Timeline {
            selection: selection.clone(),
            events,
        }
    }
}
