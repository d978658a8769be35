//! Prerender decision and relay core.
//!
//! # Data Flow
//! ```text
//! Inbound request (via RequestView)
//!     → classifier.rs (extension.rs + crawler.rs + options)
//!     → no:  host runs its next handler
//!     → yes: upstream.rs builds <service>/<scheme>://<host><path>?<query>
//!            → relay.rs calls the service
//!            → encoding.rs matches the body to the caller's Accept-Encoding
//!            → Served, or Fallback on a 5xx from the service
//! ```
//!
//! # Design Decisions
//! - Options are validated once and never change afterwards
//! - One upstream call per prerendered request, no retries
//! - The HTTP client is shared; its timeout bounds every relay

pub mod classifier;
pub mod crawler;
pub mod encoding;
pub mod error;
pub mod extension;
pub mod options;
pub mod relay;
pub mod request;
pub mod upstream;

pub use classifier::should_prerender;
pub use crawler::{is_known_crawler, CrawlerMatch};
pub use error::{PrerenderError, PrerenderResult};
pub use extension::is_prerenderable_extension;
pub use options::PrerenderOptions;
pub use relay::{RelayOutcome, RelayedResponse};
pub use request::{RequestSnapshot, RequestView};
pub use upstream::build_upstream_url;

use std::time::Duration;

use crate::config::schema::{RelayConfig, TimeoutConfig};

/// Prerender middleware core: validated options plus the upstream client.
#[derive(Debug, Clone)]
pub struct Prerender {
    options: PrerenderOptions,
    client: reqwest::Client,
}

impl Prerender {
    /// Create a prerender core with the default upstream timeouts.
    pub fn new(options: PrerenderOptions) -> PrerenderResult<Self> {
        Self::with_timeouts(options, &TimeoutConfig::default())
    }

    /// Create a prerender core whose client enforces `timeouts`.
    pub fn with_timeouts(options: PrerenderOptions, timeouts: &TimeoutConfig) -> PrerenderResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.upstream_secs))
            .build()
            .map_err(PrerenderError::Client)?;
        Ok(Self::with_client(options, client))
    }

    /// Use a caller-supplied client, e.g. one with custom proxy settings.
    pub fn with_client(options: PrerenderOptions, client: reqwest::Client) -> Self {
        Self { options, client }
    }

    /// Build from the full server configuration.
    pub fn from_config(config: &RelayConfig) -> PrerenderResult<Self> {
        let options = PrerenderOptions::from_settings(&config.prerender)?;
        Self::with_timeouts(options, &config.timeouts)
    }

    pub fn options(&self) -> &PrerenderOptions {
        &self.options
    }

    /// Whether `request` should be answered by the rendering service.
    pub fn should_prerender<R: RequestView + ?Sized>(&self, request: &R) -> bool {
        classifier::should_prerender(request, &self.options)
    }

    /// Upstream URL the relay would call for `request`.
    pub fn upstream_url<R: RequestView + ?Sized>(&self, request: &R) -> String {
        build_upstream_url(
            self.options.service_url(),
            &request.scheme(),
            &request.host(),
            request.path(),
            request.raw_query(),
        )
    }
}
