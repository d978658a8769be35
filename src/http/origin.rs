//! Origin forwarding: the "next handler" behind the prerender middleware.
//!
//! # Responsibilities
//! - Forward every request that is not prerendered to the origin app
//! - Serve the origin's answer when the rendering service fails with a 5xx
//!
//! # Design Decisions
//! - Headers, method and body are forwarded untouched, including Host
//! - Response bodies are streamed back without buffering
//! - Origin connection failures result in 502 Bad Gateway

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{Authority, InvalidUri, PathAndQuery, Scheme},
        Request, Response, StatusCode, Uri,
    },
    response::IntoResponse,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::http::request::RequestIdExt;

/// Plain-HTTP client for the origin application.
#[derive(Clone)]
pub struct Origin {
    authority: Authority,
    client: Client<HttpConnector, Body>,
}

impl Origin {
    /// `address` is a `host:port` pair.
    pub fn new(address: &str) -> Result<Self, InvalidUri> {
        let authority = address.parse::<Authority>()?;
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Ok(Self { authority, client })
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Forward `request` to the origin and return its response.
    pub async fn forward(&self, request: Request<Body>) -> Response<Body> {
        let request_id = request.request_id().to_string();
        let (mut parts, body) = request.into_parts();

        let path_and_query = parts
            .uri
            .path_and_query()
            .cloned()
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        let uri = Uri::builder()
            .scheme(Scheme::HTTP)
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build();
        parts.uri = match uri {
            Ok(uri) => uri,
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "Failed to build origin URI");
                return (StatusCode::BAD_GATEWAY, "Origin request failed").into_response();
            }
        };

        match self.client.request(Request::from_parts(parts, body)).await {
            Ok(response) => {
                let (parts, body) = response.into_parts();
                Response::from_parts(parts, Body::new(body))
            }
            Err(e) => {
                tracing::error!(
                    request_id = %request_id,
                    origin = %self.authority,
                    error = %e,
                    "Origin error"
                );
                (StatusCode::BAD_GATEWAY, "Origin request failed").into_response()
            }
        }
    }
}

/// Handler that forwards everything to the origin.
pub async fn origin_handler(State(origin): State<Arc<Origin>>, request: Request<Body>) -> Response<Body> {
    origin.forward(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_address() {
        let origin = Origin::new("127.0.0.1:3000").unwrap();
        assert_eq!(origin.authority().as_str(), "127.0.0.1:3000");
        assert!(Origin::new("not an address").is_err());
    }
}
