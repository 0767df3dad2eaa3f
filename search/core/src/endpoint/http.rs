//! HTTP Search Endpoint
//!
//! Talks to the NeuroSearch backend over plain HTTP:
//!
//! - `POST {base_url}/search` with `{ "query": ... }`
//!
//! The client-level timeout turns a hung backend into an ordinary
//! [`EndpointError::Transport`] failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;

use super::traits::{EndpointError, SearchEndpoint, SearchRequest, SearchResponse};
use crate::config::EndpointSettings;

/// Default backend address
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest response body kept in a [`EndpointError::Status`]
const MAX_ERROR_BODY: usize = 512;

/// HTTP search endpoint client
#[derive(Clone, Debug)]
pub struct HttpSearchEndpoint {
    /// Resolved `/search` URL
    search_url: Url,
    /// HTTP client
    http_client: reqwest::Client,
}

impl HttpSearchEndpoint {
    /// Create a client for a backend base URL
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::Config`] if the URL is not a valid http(s)
    /// URL, or [`EndpointError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, EndpointError> {
        let search_url = search_url(base_url)?;
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;

        tracing::debug!(url = %search_url, timeout_ms = timeout.as_millis() as u64, "Search endpoint configured");

        Ok(Self {
            search_url,
            http_client,
        })
    }

    /// Create from loaded settings
    ///
    /// # Errors
    ///
    /// See [`HttpSearchEndpoint::new`].
    pub fn from_settings(settings: &EndpointSettings) -> Result<Self, EndpointError> {
        Self::new(&settings.base_url, settings.request_timeout)
    }

    /// The URL searches are posted to
    #[must_use]
    pub fn search_url(&self) -> &Url {
        &self.search_url
    }
}

/// Resolve `{base}/search`, tolerating a trailing slash on the base
fn search_url(base_url: &str) -> Result<Url, EndpointError> {
    let base = Url::parse(base_url.trim())
        .map_err(|e| EndpointError::Config(format!("invalid base URL '{base_url}': {e}")))?;

    if !matches!(base.scheme(), "http" | "https") {
        return Err(EndpointError::Config(format!(
            "unsupported scheme '{}' in '{base_url}'",
            base.scheme()
        )));
    }

    let joined = format!("{}/search", base.as_str().trim_end_matches('/'));
    Url::parse(&joined).map_err(|e| EndpointError::Config(format!("invalid search URL: {e}")))
}

#[async_trait]
impl SearchEndpoint for HttpSearchEndpoint {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, EndpointError> {
        let response = self
            .http_client
            .post(self.search_url.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|&i| body.is_char_boundary(i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(EndpointError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| EndpointError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_resolution() {
        let endpoint = HttpSearchEndpoint::new("http://localhost:5000", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(endpoint.search_url().as_str(), "http://localhost:5000/search");

        let endpoint =
            HttpSearchEndpoint::new("https://search.example.com/api/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            endpoint.search_url().as_str(),
            "https://search.example.com/api/search"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpSearchEndpoint::new("not a url", DEFAULT_TIMEOUT).unwrap_err();
        assert!(matches!(err, EndpointError::Config(_)));

        let err = HttpSearchEndpoint::new("ftp://files.example.com", DEFAULT_TIMEOUT).unwrap_err();
        assert!(matches!(err, EndpointError::Config(_)));
    }

    #[test]
    fn test_from_settings() {
        let settings = EndpointSettings {
            base_url: "http://10.0.0.5:8080".to_string(),
            request_timeout: Duration::from_millis(1500),
        };
        let endpoint = HttpSearchEndpoint::from_settings(&settings).unwrap();
        assert_eq!(endpoint.search_url().as_str(), "http://10.0.0.5:8080/search");
        assert_eq!(endpoint.name(), "http");
    }
}
