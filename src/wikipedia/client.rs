//! Wikipedia (MediaWiki action API) client.

use anyhow::{bail, Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::types::{QueryResponse, WikiContent};
use super::util::{api_url, truncate_words};
use crate::cache::{CacheKey, ResultCache};
use crate::common::LanguageCode;
use crate::environment::Settings;
use crate::http::create_http_client;
use crate::lookup::{EmptyReason, Lookup};
use crate::TARGET_WEB_REQUEST;

/// An article's intro text under its resolved (post-redirect) title.
struct ArticleIntro {
    title: String,
    extract: String,
}

pub struct WikipediaClient {
    http: reqwest::Client,
    api_template: String,
    summary_words: usize,
    thumbnail_width: u32,
    cache: Arc<ResultCache>,
}

impl WikipediaClient {
    pub fn new(
        api_template: &str,
        user_agent: &str,
        request_timeout: Duration,
        summary_words: usize,
        thumbnail_width: u32,
        cache: Arc<ResultCache>,
    ) -> Result<Self> {
        if !api_template.contains("{lang}") {
            bail!("Wikipedia API template must contain {{lang}}: {}", api_template);
        }

        Ok(Self {
            http: create_http_client(user_agent, request_timeout)?,
            api_template: api_template.to_string(),
            summary_words,
            thumbnail_width,
            cache,
        })
    }

    pub fn from_settings(settings: &Settings, cache: Arc<ResultCache>) -> Result<Self> {
        Self::new(
            &settings.wiki_api_template,
            &settings.user_agent,
            settings.request_timeout,
            settings.summary_words,
            settings.thumbnail_width,
            cache,
        )
    }

    async fn api_query(
        &self,
        language: &LanguageCode,
        params: &[(&str, &str)],
    ) -> Result<QueryResponse> {
        let url = api_url(&self.api_template, language.as_str());
        debug!(target: TARGET_WEB_REQUEST, "Querying {} with {:?}", url, params);

        let response = self
            .http
            .get(&url)
            .query(&[("action", "query"), ("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()
            .await
            .with_context(|| format!("Wikipedia request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("Wikipedia API at {} returned status {}", url, status);
        }

        response
            .json::<QueryResponse>()
            .await
            .with_context(|| format!("Failed to parse Wikipedia response from {}", url))
    }

    /// Plain-text intro of `title`, or `None` when the page does not exist.
    async fn fetch_intro(
        &self,
        title: &str,
        language: &LanguageCode,
    ) -> Result<Option<ArticleIntro>> {
        let response = self
            .api_query(
                language,
                &[
                    ("prop", "extracts"),
                    ("exintro", "1"),
                    ("explaintext", "1"),
                    ("redirects", "1"),
                    ("titles", title),
                ],
            )
            .await?;

        let Some(page) = response.first_page() else {
            return Ok(None);
        };
        if !page.exists() {
            return Ok(None);
        }

        Ok(Some(ArticleIntro {
            title: page.title.clone().unwrap_or_else(|| title.to_string()),
            extract: page.extract.clone().unwrap_or_default().trim().to_string(),
        }))
    }

    /// URL of the page's lead thumbnail at the configured width, if it has one.
    pub async fn fetch_thumbnail(
        &self,
        title: &str,
        language: &LanguageCode,
    ) -> Result<Option<String>> {
        let width = self.thumbnail_width.to_string();
        let response = self
            .api_query(
                language,
                &[
                    ("prop", "pageimages"),
                    ("piprop", "thumbnail"),
                    ("pithumbsize", width.as_str()),
                    ("redirects", "1"),
                    ("titles", title),
                ],
            )
            .await?;

        Ok(response
            .first_page()
            .and_then(|page| page.thumbnail.as_ref())
            .map(|thumb| thumb.source.clone())
            .filter(|source| !source.is_empty()))
    }

    /// Word-capped summary and best-effort image of `page_title`.
    ///
    /// An empty title is `Empty(NoArticle)` without touching the network, a
    /// page that does not exist is `Empty(PageMissing)`. A failed image
    /// lookup only drops the image.
    pub async fn fetch_summary_and_image(
        &self,
        page_title: &str,
        language: &LanguageCode,
    ) -> Lookup<WikiContent> {
        let title = page_title.trim();
        if title.is_empty() {
            return Lookup::Empty(EmptyReason::NoArticle);
        }

        let key = CacheKey::new(
            "fetch_summary_and_image",
            [
                title.to_string(),
                language.to_string(),
                self.summary_words.to_string(),
                self.thumbnail_width.to_string(),
            ],
        );
        self.cache
            .get_or_fetch(key, move || async move {
                let intro = match self.fetch_intro(title, language).await {
                    Ok(Some(intro)) => intro,
                    Ok(None) => {
                        info!(target: TARGET_WEB_REQUEST, "No {} Wikipedia page titled {}", language, title);
                        return Lookup::Empty(EmptyReason::PageMissing);
                    }
                    Err(err) => {
                        error!(target: TARGET_WEB_REQUEST, "Summary lookup for {} ({}) failed: {:#}", title, language, err);
                        return Lookup::from(err);
                    }
                };

                let image_url = match self.fetch_thumbnail(&intro.title, language).await {
                    Ok(url) => url,
                    Err(err) => {
                        warn!(target: TARGET_WEB_REQUEST, "Image lookup for {} ({}) failed, continuing without image: {:#}", intro.title, language, err);
                        None
                    }
                };

                let (summary, truncated) = truncate_words(&intro.extract, self.summary_words);
                Lookup::Found(WikiContent {
                    summary,
                    image_url,
                    truncated,
                })
            })
            .await
    }
}
