use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::cache::DEFAULT_TTL;
use crate::http::REQUEST_TIMEOUT;
use crate::wikidata::{RegionRelation, DEFAULT_SPARQL_ENDPOINT};
use crate::wikipedia::{DEFAULT_API_TEMPLATE, DEFAULT_SUMMARY_WORDS, DEFAULT_THUMBNAIL_WIDTH};

pub const DEFAULT_USER_AGENT: &str =
    "ItihasExplorer/0.1 (https://github.com/itihas-explorer/itihas; itihas@example.org)";

/// Retrieves an environment variable, falling back to `default` when unset or empty.
pub fn get_env_var_or(var: &str, default: &str) -> String {
    env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Retrieves and parses an environment variable, logging and falling back to
/// `default` if it is set but malformed.
pub fn get_env_var_parsed<T: FromStr>(var: &str, default: T) -> T {
    match env::var(var) {
        Ok(raw) if !raw.trim().is_empty() => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring malformed {}={:?}, using default", var, raw);
                default
            }
        },
        _ => default,
    }
}

/// Runtime settings, read from `ITIHAS_*` environment variables.
#[derive(Debug, Clone)]
pub struct Settings {
    pub user_agent: String,
    pub sparql_endpoint: String,
    pub wiki_api_template: String,
    pub cache_ttl: Duration,
    pub request_timeout: Duration,
    pub regions_path: Option<PathBuf>,
    pub thumbnail_width: u32,
    pub summary_words: usize,
    pub region_relation: RegionRelation,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            sparql_endpoint: DEFAULT_SPARQL_ENDPOINT.to_string(),
            wiki_api_template: DEFAULT_API_TEMPLATE.to_string(),
            cache_ttl: DEFAULT_TTL,
            request_timeout: REQUEST_TIMEOUT,
            regions_path: None,
            thumbnail_width: DEFAULT_THUMBNAIL_WIDTH,
            summary_words: DEFAULT_SUMMARY_WORDS,
            region_relation: RegionRelation::default(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            user_agent: get_env_var_or("ITIHAS_USER_AGENT", &defaults.user_agent),
            sparql_endpoint: get_env_var_or("ITIHAS_SPARQL_ENDPOINT", &defaults.sparql_endpoint),
            wiki_api_template: get_env_var_or(
                "ITIHAS_WIKI_API_TEMPLATE",
                &defaults.wiki_api_template,
            ),
            cache_ttl: Duration::from_secs(get_env_var_parsed(
                "ITIHAS_CACHE_TTL_SECS",
                defaults.cache_ttl.as_secs(),
            )),
            request_timeout: Duration::from_secs(get_env_var_parsed(
                "ITIHAS_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
            regions_path: env::var("ITIHAS_REGIONS_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            thumbnail_width: get_env_var_parsed("ITIHAS_THUMBNAIL_WIDTH", defaults.thumbnail_width),
            summary_words: get_env_var_parsed("ITIHAS_SUMMARY_WORDS", defaults.summary_words),
            region_relation: get_env_var_parsed(
                "ITIHAS_REGION_RELATION",
                defaults.region_relation,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_fallbacks() {
        env::set_var("ITIHAS_TEST_EMPTY", "   ");
        env::set_var("ITIHAS_TEST_NUMBER", "42");
        env::set_var("ITIHAS_TEST_GARBAGE", "forty-two");

        assert_eq!(get_env_var_or("ITIHAS_TEST_EMPTY", "fallback"), "fallback");
        assert_eq!(get_env_var_or("ITIHAS_TEST_UNSET_VAR", "fallback"), "fallback");
        assert_eq!(get_env_var_parsed("ITIHAS_TEST_NUMBER", 0u64), 42);
        assert_eq!(get_env_var_parsed("ITIHAS_TEST_GARBAGE", 7u64), 7);
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.cache_ttl, Duration::from_secs(3600));
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.summary_words, 150);
        assert_eq!(settings.region_relation, RegionRelation::Direct);
        assert!(settings.sparql_endpoint.starts_with("https://query.wikidata.org"));
    }
}
