//! Upstream call and response translation.
//!
//! # State machine
//! ```text
//! Start → UpstreamCalled ─┬─ 500..=511 → Fallback (upstream response kept verbatim)
//!                         └─ otherwise → Transcoding → Served
//! ```
//! Transport failures and broken gzip streams abort the relay with an error.
//! Nothing is retried and nothing outlives the request.

use std::time::Instant;

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Response, StatusCode},
    response::IntoResponse,
};
use bytes::Bytes;

use crate::observability::metrics;
use crate::prerender::encoding::{self, Transcode};
use crate::prerender::error::{PrerenderError, PrerenderResult};
use crate::prerender::request::RequestView;
use crate::prerender::Prerender;

/// User-agent this middleware identifies itself with upstream.
pub const MIDDLEWARE_USER_AGENT: &str = "prerender-cloud-rust-middleware";

pub const X_PRERENDER_TOKEN: HeaderName = HeaderName::from_static("x-prerender-token");
pub const X_ORIGINAL_USER_AGENT: HeaderName = HeaderName::from_static("x-original-user-agent");

/// A fully buffered response ready to go back to the caller.
#[derive(Debug, Clone)]
pub struct RelayedResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub content_encoding: Option<HeaderValue>,
    pub body: Bytes,
}

impl IntoResponse for RelayedResponse {
    fn into_response(self) -> Response<Body> {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        let headers = response.headers_mut();
        if let Some(content_type) = self.content_type {
            headers.insert(header::CONTENT_TYPE, content_type);
        }
        if let Some(content_encoding) = self.content_encoding {
            headers.insert(header::CONTENT_ENCODING, content_encoding);
        }
        response
    }
}

/// Result of one relay attempt.
#[derive(Debug)]
pub enum RelayOutcome {
    /// The rendered page, re-encoded for the caller.
    Served(RelayedResponse),
    /// The service reported a server error. The host should run its own
    /// handler; without one, the carried upstream response is served as is.
    Fallback(RelayedResponse),
}

/// Statuses that hand the request back to the host application.
pub fn is_upstream_server_error(status: StatusCode) -> bool {
    (500..=511).contains(&status.as_u16())
}

impl Prerender {
    /// Fetch the rendered page for `request` from the rendering service.
    pub async fn relay<R: RequestView + ?Sized>(&self, request: &R) -> PrerenderResult<RelayOutcome> {
        let upstream_url = self.upstream_url(request);

        let mut upstream = self
            .client
            .get(upstream_url.as_str())
            .header(header::USER_AGENT, MIDDLEWARE_USER_AGENT)
            .header(header::ACCEPT_ENCODING, "gzip");

        // Forwarded as received; the bytes need not be UTF-8.
        if let Some(user_agent) = request.header_value(&header::USER_AGENT) {
            upstream = upstream.header(X_ORIGINAL_USER_AGENT, user_agent.clone());
        }

        if let Some(token) = self.options.token() {
            upstream = upstream.header(X_PRERENDER_TOKEN, token.clone());
        }

        let content_type = request
            .header_value(&header::CONTENT_TYPE)
            .filter(|v| !v.is_empty());
        if let Some(content_type) = content_type {
            upstream = upstream.header(header::CONTENT_TYPE, content_type.clone());
        }

        let start = Instant::now();
        let response = upstream
            .send()
            .await
            .map_err(PrerenderError::from_reqwest)
            .inspect_err(|e| metrics::record_relay_error(e.kind()))?;

        let status = response.status();
        let upstream_type = response.headers().get(header::CONTENT_TYPE).cloned();
        let upstream_encoding = response.headers().get(header::CONTENT_ENCODING).cloned();

        // Buffer the whole body; the response (and its connection) is
        // released as soon as this returns, on success or error.
        let body = response
            .bytes()
            .await
            .map_err(PrerenderError::from_reqwest)
            .inspect_err(|e| metrics::record_relay_error(e.kind()))?;

        metrics::record_upstream(status.as_u16(), start);

        tracing::debug!(
            upstream_url = %upstream_url,
            status = %status,
            bytes = body.len(),
            "Prerender service responded"
        );

        if is_upstream_server_error(status) {
            tracing::warn!(
                upstream_url = %upstream_url,
                status = %status,
                "Prerender service server error"
            );
            return Ok(RelayOutcome::Fallback(RelayedResponse {
                status,
                content_type: upstream_type,
                content_encoding: upstream_encoding,
                body,
            }));
        }

        let encoding_name = upstream_encoding
            .as_ref()
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        let plan = Transcode::plan_for_body(
            &request.header_text(&header::ACCEPT_ENCODING),
            encoding_name,
            &body,
        );
        metrics::record_transcode(plan.as_str());

        let relayed = match plan {
            Transcode::Compress => RelayedResponse {
                status,
                content_type: upstream_type,
                content_encoding: Some(HeaderValue::from_static("gzip")),
                body: encoding::gzip(&body)
                    .map(Bytes::from)
                    .map_err(PrerenderError::Encode)
                    .inspect_err(|e| metrics::record_relay_error(e.kind()))?,
            },
            Transcode::Decompress => RelayedResponse {
                status,
                content_type: upstream_type,
                content_encoding: None,
                body: encoding::gunzip(&body)
                    .map(Bytes::from)
                    .map_err(PrerenderError::Decode)
                    .inspect_err(|e| metrics::record_relay_error(e.kind()))?,
            },
            // An empty body carries no encoding, whatever the label said.
            Transcode::Passthrough => RelayedResponse {
                status,
                content_type: upstream_type,
                content_encoding: upstream_encoding.filter(|_| !body.is_empty()),
                body,
            },
        };

        Ok(RelayOutcome::Served(relayed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_range() {
        assert!(!is_upstream_server_error(StatusCode::OK));
        assert!(!is_upstream_server_error(StatusCode::NOT_FOUND));
        assert!(is_upstream_server_error(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(is_upstream_server_error(StatusCode::NOT_IMPLEMENTED));
        assert!(is_upstream_server_error(StatusCode::NETWORK_AUTHENTICATION_REQUIRED));
        assert!(!is_upstream_server_error(StatusCode::from_u16(599).unwrap()));
    }

    #[test]
    fn test_relayed_response_headers() {
        let response = RelayedResponse {
            status: StatusCode::CREATED,
            content_type: Some(HeaderValue::from_static("text/html; charset=utf-8")),
            content_encoding: None,
            body: Bytes::from_static(b"prerendered response"),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
        assert!(response.headers().get(header::CONTENT_ENCODING).is_none());
    }
}
