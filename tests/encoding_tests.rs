//! gzip translation between the rendering service and the caller.

use axum::http::StatusCode;
use prerender_relay::prerender::PrerenderOptions;

mod common;

const PAGE: &[u8] = b"<html><head><title>rendered</title></head><body>prerendered response</body></html>";

async fn relay_to(service: &common::MockBackend) -> (std::net::SocketAddr, prerender_relay::Shutdown) {
    let origin = common::start_mock_backend(200, &[], b"origin".to_vec()).await;
    common::start_relay(PrerenderOptions::new(&service.url()).unwrap(), Some(&origin)).await
}

#[tokio::test]
async fn test_gzipped_upstream_is_decompressed_for_plain_client() {
    let service = common::start_mock_backend(
        200,
        &[("content-type", "text/html"), ("content-encoding", "gzip")],
        common::gzip(PAGE),
    )
    .await;
    let (addr, shutdown) = relay_to(&service).await;

    let res = common::client()
        .get(format!("http://{}/", addr))
        .header("User-Agent", "example-user-agent")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get("content-encoding").is_none());
    assert_eq!(res.headers().get("content-type").unwrap(), "text/html");
    assert_eq!(res.bytes().await.unwrap().as_ref(), PAGE);

    shutdown.trigger();
}

#[tokio::test]
async fn test_plain_upstream_is_compressed_for_gzip_client() {
    let service = common::start_mock_backend(200, &[("content-type", "text/html")], PAGE.to_vec()).await;
    let (addr, shutdown) = relay_to(&service).await;

    let res = common::client()
        .get(format!("http://{}/", addr))
        .header("User-Agent", "example-user-agent")
        .header("Accept-Encoding", "gzip, deflate, br")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get("content-encoding").unwrap(), "gzip");
    assert_eq!(res.headers().get("content-type").unwrap(), "text/html");
    let body = res.bytes().await.unwrap();
    assert_eq!(common::gunzip(&body), PAGE);

    shutdown.trigger();
}

#[tokio::test]
async fn test_matching_encodings_pass_through() {
    let compressed = common::gzip(PAGE);
    let service = common::start_mock_backend(
        200,
        &[("content-type", "text/html"), ("content-encoding", "gzip")],
        compressed.clone(),
    )
    .await;
    let (addr, shutdown) = relay_to(&service).await;

    let res = common::client()
        .get(format!("http://{}/", addr))
        .header("User-Agent", "example-user-agent")
        .header("Accept-Encoding", "gzip")
        .send()
        .await
        .unwrap();

    assert_eq!(res.headers().get("content-encoding").unwrap(), "gzip");
    assert_eq!(res.bytes().await.unwrap().as_ref(), compressed.as_slice());

    let plain = common::start_mock_backend(200, &[("content-type", "text/html")], PAGE.to_vec()).await;
    let (plain_addr, plain_shutdown) = relay_to(&plain).await;

    let res = common::client()
        .get(format!("http://{}/", plain_addr))
        .header("User-Agent", "example-user-agent")
        .send()
        .await
        .unwrap();

    assert!(res.headers().get("content-encoding").is_none());
    assert_eq!(res.bytes().await.unwrap().as_ref(), PAGE);

    shutdown.trigger();
    plain_shutdown.trigger();
}

#[tokio::test]
async fn test_corrupt_gzip_is_an_error() {
    let service = common::start_mock_backend(
        200,
        &[("content-type", "text/html"), ("content-encoding", "gzip")],
        b"this is not gzip".to_vec(),
    )
    .await;
    let (addr, shutdown) = relay_to(&service).await;

    let res = common::client()
        .get(format!("http://{}/", addr))
        .header("User-Agent", "example-user-agent")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    shutdown.trigger();
}

#[tokio::test]
async fn test_empty_gzip_labelled_body_is_served_empty() {
    let service = common::start_mock_backend(
        200,
        &[("content-type", "text/html"), ("content-encoding", "gzip")],
        Vec::new(),
    )
    .await;
    let (addr, shutdown) = relay_to(&service).await;

    let res = common::client()
        .get(format!("http://{}/", addr))
        .header("User-Agent", "example-user-agent")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get("content-encoding").is_none());
    assert!(res.bytes().await.unwrap().is_empty());

    let res = common::client()
        .get(format!("http://{}/", addr))
        .header("User-Agent", "example-user-agent")
        .header("Accept-Encoding", "gzip")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get("content-encoding").is_none());
    assert!(res.bytes().await.unwrap().is_empty());

    shutdown.trigger();
}
