//! Bridge client against a local stand-in for the companion app.

use msx_bridge::{BridgeClient, BridgeError};
use serde_json::json;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use warp::http::StatusCode;
use warp::Filter;

/// Serve a filter on an ephemeral port and evaluate to its endpoint URL
macro_rules! serve {
    ($routes:expr) => {{
        let (addr, server) = warp::serve($routes).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        format!("http://{addr}/GetMegascansFolder")
    }};
}

fn unused_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

#[tokio::test]
async fn returns_reported_folder() {
    let url = serve!(warp::any().map(|| warp::reply::json(&json!({ "folder": "/data/Megascans Library" }))));

    let folder = BridgeClient::new(url, 5).unwrap().library_folder().await.unwrap();
    assert_eq!(folder, PathBuf::from("/data/Megascans Library"));
}

#[tokio::test]
async fn extra_fields_are_ignored() {
    let url = serve!(warp::any().map(|| warp::reply::json(&json!({ "folder": "/lib", "version": 3 }))));

    let folder = BridgeClient::new(url, 5).unwrap().library_folder().await.unwrap();
    assert_eq!(folder, PathBuf::from("/lib"));
}

#[tokio::test]
async fn non_success_status() {
    let url = serve!(warp::any().map(|| warp::reply::with_status("busy", StatusCode::SERVICE_UNAVAILABLE)));

    let err = BridgeClient::new(url, 5).unwrap().library_folder().await.unwrap_err();
    assert!(matches!(err, BridgeError::Status(503)), "got {err:?}");
}

#[tokio::test]
async fn malformed_body() {
    let url = serve!(warp::any().map(|| warp::reply::json(&json!({ "path": "/lib" }))));

    let err = BridgeClient::new(url, 5).unwrap().library_folder().await.unwrap_err();
    assert!(matches!(err, BridgeError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn empty_folder_is_rejected() {
    let url = serve!(warp::any().map(|| warp::reply::json(&json!({ "folder": "" }))));

    let err = BridgeClient::new(url, 5).unwrap().library_folder().await.unwrap_err();
    assert!(matches!(err, BridgeError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn slow_app_times_out() {
    let slow = warp::any().and_then(|| async {
        tokio::time::sleep(Duration::from_secs(3)).await;
        Ok::<_, Infallible>(warp::reply::json(&json!({ "folder": "/lib" })))
    });
    let url = serve!(slow);

    let err = BridgeClient::new(url, 1).unwrap().library_folder().await.unwrap_err();
    assert!(matches!(err, BridgeError::Timeout { secs: 1, .. }), "got {err:?}");
}

#[tokio::test]
async fn app_not_running() {
    let url = format!("http://{}/GetMegascansFolder/", unused_addr());

    let err = BridgeClient::new(url, 5).unwrap().library_folder().await.unwrap_err();
    assert!(matches!(err, BridgeError::Connect(_)), "got {err:?}");
}
