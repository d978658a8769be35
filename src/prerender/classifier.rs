//! Prerender decision.
//!
//! Each gate below can only exclude a request; the first exclusion wins.

use axum::http::Method;

use crate::prerender::crawler::is_known_crawler;
use crate::prerender::extension::is_prerenderable_extension;
use crate::prerender::options::PrerenderOptions;
use crate::prerender::request::{RequestView, X_BUFFERBOT, X_PRERENDERED};

/// User-agent sent by the rendering service itself.
pub const SERVICE_USER_AGENT: &str = "prerendercloud";

/// Query key of the (deprecated) AJAX crawling scheme.
pub const ESCAPED_FRAGMENT: &str = "_escaped_fragment_";

/// Decide whether `request` should be answered by the rendering service.
pub fn should_prerender<R: RequestView + ?Sized>(request: &R, options: &PrerenderOptions) -> bool {
    let user_agent = request.user_agent().to_lowercase();

    // Agentless traffic (health checks) and our own upstream fetches.
    if user_agent.is_empty() || user_agent == SERVICE_USER_AGENT {
        return false;
    }

    // Already rendered further up a chain of middlewares.
    if request.has_header(&X_PRERENDERED) {
        return false;
    }

    let method = request.method();
    if *method != Method::GET && *method != Method::HEAD {
        return false;
    }

    if !is_prerenderable_extension(request.path()) {
        return false;
    }

    if !options.bots_only() {
        return true;
    }

    request.has_header(&X_BUFFERBOT)
        || has_escaped_fragment(request.raw_query())
        || is_known_crawler(&user_agent, options.crawler_match())
}

fn has_escaped_fragment(raw_query: &str) -> bool {
    !raw_query.is_empty()
        && url::form_urlencoded::parse(raw_query.as_bytes()).any(|(key, _)| key == ESCAPED_FRAGMENT)
}
