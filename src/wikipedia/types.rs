//! Type definitions for the Wikipedia module.

use serde::{Deserialize, Serialize};

/// MediaWiki action API; `{lang}` is replaced with the language code.
pub const DEFAULT_API_TEMPLATE: &str = "https://{lang}.wikipedia.org/w/api.php";
pub const DEFAULT_SUMMARY_WORDS: usize = 150;
pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 500;
pub const CONTINUATION_MARKER: &str = "...";

/// Summary and lead image of one article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiContent {
    pub summary: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub truncated: bool,
}

/// `action=query` response body with `formatversion=2`.
#[derive(Debug, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub query: Option<QueryBody>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QueryBody {
    #[serde(default)]
    pub pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub missing: bool,
    #[serde(default)]
    pub invalid: bool,
    #[serde(default)]
    pub extract: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
}

impl Page {
    pub fn exists(&self) -> bool {
        !self.missing && !self.invalid
    }
}

#[derive(Debug, Deserialize)]
pub struct Thumbnail {
    pub source: String,
}

impl QueryResponse {
    pub fn first_page(&self) -> Option<&Page> {
        self.query.as_ref().and_then(|q| q.pages.first())
    }
}
