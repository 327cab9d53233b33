//! HTTP client creation shared by the Wikidata and Wikipedia clients.

use anyhow::Result;
use reqwest::header;
use tokio::time::Duration;
use tracing::debug;

use crate::TARGET_WEB_REQUEST;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds a client that identifies itself with `user_agent`, as both
/// Wikimedia services require.
///
/// `request_timeout` bounds the whole request, body included.
pub fn create_http_client(user_agent: &str, request_timeout: Duration) -> Result<reqwest::Client> {
    debug!(target: TARGET_WEB_REQUEST, "Creating HTTP client with user agent {}", user_agent);

    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );

    reqwest::Client::builder()
        .user_agent(user_agent)
        .default_headers(headers)
        .gzip(true)
        .timeout(request_timeout)
        .redirect(reqwest::redirect::Policy::default())
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))
}
