//! Error taxonomy for classification and relay.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors raised while building or relaying a prerender request.
#[derive(Debug, Error)]
pub enum PrerenderError {
    /// The configured service URL could not be parsed.
    #[error("invalid prerender service URL '{url}': {reason}")]
    InvalidServiceUrl { url: String, reason: String },

    /// The configured token cannot be sent as a header value.
    #[error("invalid prerender token: {reason}")]
    InvalidToken { reason: String },

    /// The composed upstream URL was rejected by the HTTP client.
    #[error("invalid upstream URL '{0}'")]
    InvalidUpstreamUrl(String),

    /// The upstream could not be reached or the exchange broke off.
    #[error("upstream transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The upstream did not answer within the client timeout.
    #[error("upstream timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// Compressing the upstream body for the caller failed.
    #[error("failed to gzip upstream body: {0}")]
    Encode(#[source] std::io::Error),

    /// The upstream claimed gzip but the body did not decode.
    #[error("failed to gunzip upstream body: {0}")]
    Decode(#[source] std::io::Error),

    /// The shared HTTP client could not be constructed.
    #[error("failed to build upstream client: {0}")]
    Client(#[source] reqwest::Error),
}

impl PrerenderError {
    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            PrerenderError::InvalidServiceUrl { .. } => "invalid_service_url",
            PrerenderError::InvalidToken { .. } => "invalid_token",
            PrerenderError::InvalidUpstreamUrl(_) => "invalid_upstream_url",
            PrerenderError::Transport(_) => "transport",
            PrerenderError::Timeout(_) => "timeout",
            PrerenderError::Encode(_) => "encode",
            PrerenderError::Decode(_) => "decode",
            PrerenderError::Client(_) => "client",
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PrerenderError::Timeout(err)
        } else if err.is_builder() {
            let url = err.url().map(|u| u.to_string()).unwrap_or_default();
            PrerenderError::InvalidUpstreamUrl(url)
        } else {
            PrerenderError::Transport(err)
        }
    }
}

/// Result type for prerender operations.
pub type PrerenderResult<T> = Result<T, PrerenderError>;

impl IntoResponse for PrerenderError {
    fn into_response(self) -> Response {
        // Callers only ever see a generic failure; details stay in the logs.
        match self {
            PrerenderError::Timeout(_) => {
                (StatusCode::GATEWAY_TIMEOUT, "Upstream request timed out").into_response()
            }
            _ => (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response(),
        }
    }
}
