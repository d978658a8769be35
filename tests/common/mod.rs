//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::io::{Read, Write};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderMap, HeaderName, HeaderValue, Request, Response, StatusCode},
    Router,
};
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use tokio::net::TcpListener;

use prerender_relay::config::RelayConfig;
use prerender_relay::http::HttpServer;
use prerender_relay::lifecycle::Shutdown;
use prerender_relay::prerender::{Prerender, PrerenderOptions};

/// What a mock backend saw.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub uri: String,
    pub headers: HeaderMap,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A running mock server and the requests it received.
#[derive(Clone)]
pub struct MockBackend {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockBackend {
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// Start a programmable mock backend on an ephemeral port.
pub async fn start_programmable_backend<F, Fut>(f: F) -> MockBackend
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response<Body>> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));

    let f = Arc::new(f);
    let log = requests.clone();
    let app = Router::new().fallback(move |req: Request<Body>| {
        let f = f.clone();
        let log = log.clone();
        async move {
            let recorded = RecordedRequest {
                method: req.method().to_string(),
                uri: req.uri().to_string(),
                headers: req.headers().clone(),
            };
            log.lock().unwrap().push(recorded.clone());
            f(recorded).await
        }
    });

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockBackend { addr, requests }
}

/// Start a mock backend that always answers with the same response.
pub async fn start_mock_backend(
    status: u16,
    headers: &'static [(&'static str, &'static str)],
    body: Vec<u8>,
) -> MockBackend {
    start_programmable_backend(move |_| {
        let body = body.clone();
        async move { response(status, headers, body) }
    })
    .await
}

pub fn response(status: u16, headers: &[(&str, &str)], body: Vec<u8>) -> Response<Body> {
    let mut res = Response::new(Body::from(body));
    *res.status_mut() = StatusCode::from_u16(status).unwrap();
    for (name, value) in headers {
        res.headers_mut().insert(
            HeaderName::from_bytes(name.as_bytes()).unwrap(),
            HeaderValue::from_str(value).unwrap(),
        );
    }
    res
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

pub fn prerender_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(timeout)
        .build()
        .unwrap()
}

/// Start the relay with the given prerender options in front of `origin`.
pub async fn start_relay(options: PrerenderOptions, origin: Option<&MockBackend>) -> (SocketAddr, Shutdown) {
    start_relay_with_timeout(options, origin, Duration::from_secs(5)).await
}

pub async fn start_relay_with_timeout(
    options: PrerenderOptions,
    origin: Option<&MockBackend>,
    upstream_timeout: Duration,
) -> (SocketAddr, Shutdown) {
    let mut config = RelayConfig::default();
    config.prerender.service_url = options.service_url().to_string();
    config.origin.address = origin.map(|o| o.addr.to_string());
    config.observability.metrics_enabled = false;

    let prerender = Arc::new(Prerender::with_client(options, prerender_client(upstream_timeout)));
    let server = HttpServer::with_prerender(config, prerender).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Test client: no proxies, no automatic decompression.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn gunzip(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    GzDecoder::new(data).read_to_end(&mut out).unwrap();
    out
}
