//! Upstream URL composition.
//!
//! The rendering service takes the full target URL as its path:
//! `<service>/<scheme>://<host><path>?<query>`. This is plain string
//! concatenation; nothing is re-escaped.

/// Compose the upstream URL from the service base and the inbound request.
pub fn build_upstream_url(
    service_url: &str,
    scheme: &str,
    host: &str,
    path: &str,
    raw_query: &str,
) -> String {
    let scheme = if scheme.is_empty() { "http" } else { scheme };

    let mut url = String::with_capacity(
        service_url.len() + scheme.len() + host.len() + path.len() + raw_query.len() + 5,
    );
    url.push_str(service_url);
    if !url.ends_with('/') {
        url.push('/');
    }
    url.push_str(scheme);
    url.push_str("://");
    url.push_str(host);
    url.push_str(path);

    if !raw_query.is_empty() {
        url.push('?');
        url.push_str(raw_query);
    }

    url
}
