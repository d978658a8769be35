//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::prerender::crawler::CrawlerMatch;
use crate::prerender::options::DEFAULT_SERVICE_URL;

/// Root configuration for the prerender relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Rendering service settings.
    pub prerender: PrerenderSettings,

    /// Application served when a request is not prerendered.
    pub origin: OriginConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Rendering service settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PrerenderSettings {
    /// Base URL of the rendering service.
    pub service_url: String,

    /// Sent as `X-Prerender-Token` when non-empty.
    pub token: String,

    /// Restrict prerendering to crawlers, escaped-fragment and bufferbot requests.
    pub bots_only: bool,

    /// How user-agents are compared with crawler signatures.
    pub crawler_match: CrawlerMatch,
}

impl Default for PrerenderSettings {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            token: String::new(),
            bots_only: false,
            crawler_match: CrawlerMatch::default(),
        }
    }
}

/// Origin application configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OriginConfig {
    /// Origin address (e.g., "127.0.0.1:3000"). Without an origin the relay
    /// answers non-prerendered requests with 404 and passes service errors
    /// through unchanged.
    pub address: Option<String>,
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout towards the rendering service in seconds.
    pub connect_secs: u64,

    /// Total time allowed for one rendering service call in seconds.
    pub upstream_secs: u64,

    /// Inbound request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 20,
            request_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Pretty output for development, JSON for log aggregation.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: RelayConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.prerender.service_url, DEFAULT_SERVICE_URL);
        assert!(config.origin.address.is_none());
        assert_eq!(config.timeouts.upstream_secs, 20);
    }

    #[test]
    fn test_full_toml() {
        let config: RelayConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:8000"

            [prerender]
            service_url = "http://127.0.0.1:3000/"
            token = "abc"
            bots_only = true
            crawler_match = "user_agent_in_signature"

            [origin]
            address = "127.0.0.1:4000"

            [timeouts]
            upstream_secs = 3

            [observability]
            log_format = "json"
            metrics_enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.prerender.token, "abc");
        assert!(config.prerender.bots_only);
        assert_eq!(config.prerender.crawler_match, CrawlerMatch::UserAgentInSignature);
        assert_eq!(config.origin.address.as_deref(), Some("127.0.0.1:4000"));
        assert_eq!(config.timeouts.upstream_secs, 3);
        assert_eq!(config.timeouts.connect_secs, 5);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert!(!config.observability.metrics_enabled);
    }
}
