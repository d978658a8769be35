//! Prerender middleware.
//!
//! Two bindings of the same core:
//! - [`prerender_middleware`] sits in front of a next handler. Requests that
//!   are not prerendered, and requests the rendering service fails on with a
//!   5xx, go to that handler.
//! - [`prerender_handler`] has no next handler. Requests that are not
//!   prerendered get 404 and service 5xx responses are passed through as is.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::request::RequestIdExt;
use crate::observability::metrics;
use crate::prerender::{Prerender, RelayOutcome};

pub async fn prerender_middleware(
    State(prerender): State<Arc<Prerender>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let decision = prerender.should_prerender(&request);
    metrics::record_decision(decision);

    if !decision {
        return next.run(request).await;
    }

    // Only the head is borrowed across the upstream call.
    let (parts, body) = request.into_parts();
    let request_id = parts.headers.request_id().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        path = %parts.uri.path(),
        "Prerendering request"
    );

    match prerender.relay(&parts).await {
        Ok(RelayOutcome::Served(relayed)) => relayed.into_response(),
        Ok(RelayOutcome::Fallback(relayed)) => {
            metrics::record_fallback();
            tracing::info!(
                request_id = %request_id,
                status = %relayed.status,
                "Prerender service failed, falling back to next handler"
            );
            next.run(Request::from_parts(parts, body)).await
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Prerender relay failed");
            e.into_response()
        }
    }
}

pub async fn prerender_handler(
    State(prerender): State<Arc<Prerender>>,
    request: Request<Body>,
) -> Response {
    let decision = prerender.should_prerender(&request);
    metrics::record_decision(decision);

    if !decision {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    }

    let (parts, _body) = request.into_parts();
    let request_id = parts.headers.request_id().to_string();

    match prerender.relay(&parts).await {
        Ok(RelayOutcome::Served(relayed)) => relayed.into_response(),
        Ok(RelayOutcome::Fallback(relayed)) => {
            metrics::record_fallback();
            tracing::info!(
                request_id = %request_id,
                status = %relayed.status,
                "Prerender service failed, no next handler; passing error through"
            );
            relayed.into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Prerender relay failed");
            e.into_response()
        }
    }
}
