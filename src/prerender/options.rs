//! Immutable prerender settings resolved once at construction.

use axum::http::HeaderValue;
use url::Url;

use crate::config::schema::PrerenderSettings;
use crate::prerender::crawler::CrawlerMatch;
use crate::prerender::error::{PrerenderError, PrerenderResult};

/// Public rendering endpoint used when nothing else is configured.
pub const DEFAULT_SERVICE_URL: &str = "https://service.headless-render-api.com/";

/// Validated prerender configuration, shared read-only by all requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrerenderOptions {
    service_url: String,
    token: Option<HeaderValue>,
    bots_only: bool,
    crawler_match: CrawlerMatch,
}

impl PrerenderOptions {
    /// Parse `service_url` and normalize it to end with a single `/`.
    pub fn new(service_url: &str) -> PrerenderResult<Self> {
        let parsed = Url::parse(service_url).map_err(|e| PrerenderError::InvalidServiceUrl {
            url: service_url.to_string(),
            reason: e.to_string(),
        })?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(PrerenderError::InvalidServiceUrl {
                url: service_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let mut normalized = parsed.to_string();
        while normalized.ends_with("//") {
            normalized.pop();
        }
        if !normalized.ends_with('/') {
            normalized.push('/');
        }

        Ok(Self {
            service_url: normalized,
            token: None,
            bots_only: false,
            crawler_match: CrawlerMatch::default(),
        })
    }

    pub fn from_settings(settings: &PrerenderSettings) -> PrerenderResult<Self> {
        Ok(Self::new(&settings.service_url)?
            .with_token(&settings.token)?
            .with_bots_only(settings.bots_only)
            .with_crawler_match(settings.crawler_match))
    }

    /// Set the service token. An empty token means none is sent; anything
    /// that cannot travel as a header value is rejected here.
    pub fn with_token(mut self, token: &str) -> PrerenderResult<Self> {
        if token.is_empty() {
            self.token = None;
            return Ok(self);
        }
        let mut value = HeaderValue::from_str(token).map_err(|e| PrerenderError::InvalidToken {
            reason: e.to_string(),
        })?;
        value.set_sensitive(true);
        self.token = Some(value);
        Ok(self)
    }

    pub fn with_bots_only(mut self, bots_only: bool) -> Self {
        self.bots_only = bots_only;
        self
    }

    pub fn with_crawler_match(mut self, crawler_match: CrawlerMatch) -> Self {
        self.crawler_match = crawler_match;
        self
    }

    /// Service base URL, always ending in `/`.
    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    pub fn token(&self) -> Option<&HeaderValue> {
        self.token.as_ref()
    }

    pub fn bots_only(&self) -> bool {
        self.bots_only
    }

    pub fn crawler_match(&self) -> CrawlerMatch {
        self.crawler_match
    }
}

impl Default for PrerenderOptions {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            token: None,
            bots_only: false,
            crawler_match: CrawlerMatch::default(),
        }
    }
}
