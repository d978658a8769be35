//! Read-only view of an inbound request.
//!
//! The classifier and relay only ever look at a handful of request
//! properties. Host bindings expose them through [`RequestView`] so the core
//! stays independent of any particular server framework.

use std::borrow::Cow;

use axum::http::{header, request::Parts, HeaderMap, HeaderName, HeaderValue, Method, Request, Uri};
use serde::Deserialize;

pub const X_PRERENDERED: HeaderName = HeaderName::from_static("x-prerendered");
pub const X_BUFFERBOT: HeaderName = HeaderName::from_static("x-bufferbot");
pub const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");
pub const CF_VISITOR: HeaderName = HeaderName::from_static("cf-visitor");

/// Capabilities the prerender core needs from an inbound request.
pub trait RequestView {
    fn method(&self) -> &Method;

    /// Request scheme, or an empty string when the binding cannot tell.
    fn scheme(&self) -> String;

    fn host(&self) -> String;

    /// Path as received, still percent-encoded.
    fn path(&self) -> &str;

    /// Raw query string without the leading `?`.
    fn raw_query(&self) -> &str;

    fn headers(&self) -> &HeaderMap;

    /// Raw header value, whatever bytes it carries.
    fn header_value(&self, name: &HeaderName) -> Option<&HeaderValue> {
        self.headers().get(name)
    }

    /// True when the header is present with a non-empty value.
    fn has_header(&self, name: &HeaderName) -> bool {
        self.header_value(name).is_some_and(|v| !v.is_empty())
    }

    /// Header value as text. Bytes that are not UTF-8 are replaced, never
    /// dropped, so an exotic value still counts as set.
    fn header_text(&self, name: &HeaderName) -> Cow<'_, str> {
        self.header_value(name)
            .map(|v| String::from_utf8_lossy(v.as_bytes()))
            .unwrap_or(Cow::Borrowed(""))
    }

    fn user_agent(&self) -> Cow<'_, str> {
        self.header_text(&header::USER_AGENT)
    }
}

#[derive(Deserialize)]
struct CfVisitor {
    scheme: String,
}

/// Works out the original scheme for origin-form requests, where the URI
/// carries none. Proxies in front of us report it in `X-Forwarded-Proto`,
/// Cloudflare in the `CF-Visitor` JSON header.
fn resolve_scheme(uri: &Uri, headers: &HeaderMap) -> String {
    if let Some(scheme) = uri.scheme_str() {
        return scheme.to_string();
    }

    let forwarded = headers
        .get(&X_FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_ascii_lowercase());
    if let Some(proto) = forwarded.filter(|p| p == "http" || p == "https") {
        return proto;
    }

    headers
        .get(&CF_VISITOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| serde_json::from_str::<CfVisitor>(v).ok())
        .map(|v| v.scheme.to_ascii_lowercase())
        .filter(|s| s == "http" || s == "https")
        .unwrap_or_default()
}

fn resolve_host(uri: &Uri, headers: &HeaderMap) -> String {
    if let Some(authority) = uri.authority() {
        return authority.to_string();
    }
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

impl<B> RequestView for Request<B> {
    fn method(&self) -> &Method {
        self.method()
    }

    fn scheme(&self) -> String {
        resolve_scheme(self.uri(), self.headers())
    }

    fn host(&self) -> String {
        resolve_host(self.uri(), self.headers())
    }

    fn path(&self) -> &str {
        self.uri().path()
    }

    fn raw_query(&self) -> &str {
        self.uri().query().unwrap_or("")
    }

    fn headers(&self) -> &HeaderMap {
        self.headers()
    }
}

impl RequestView for Parts {
    fn method(&self) -> &Method {
        &self.method
    }

    fn scheme(&self) -> String {
        resolve_scheme(&self.uri, &self.headers)
    }

    fn host(&self) -> String {
        resolve_host(&self.uri, &self.headers)
    }

    fn path(&self) -> &str {
        self.uri.path()
    }

    fn raw_query(&self) -> &str {
        self.uri.query().unwrap_or("")
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

/// Owned request description, for callers that have no live request
/// object (the CLI, tests).
#[derive(Debug, Clone)]
pub struct RequestSnapshot {
    pub method: Method,
    pub scheme: String,
    pub host: String,
    pub path: String,
    pub query: String,
    pub headers: HeaderMap,
}

impl RequestSnapshot {
    /// Snapshot of a request for an absolute URL.
    pub fn from_url(method: Method, url: &url::Url, headers: HeaderMap) -> Self {
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        };
        Self {
            method,
            scheme: url.scheme().to_string(),
            host,
            path: url.path().to_string(),
            query: url.query().unwrap_or("").to_string(),
            headers,
        }
    }
}

impl RequestView for RequestSnapshot {
    fn method(&self) -> &Method {
        &self.method
    }

    fn scheme(&self) -> String {
        self.scheme.clone()
    }

    fn host(&self) -> String {
        self.host.clone()
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn raw_query(&self) -> &str {
        &self.query
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}
