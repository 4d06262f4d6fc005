//! # HTTP Smoke Tests
//!
//! The gateway bound to a real socket, spoken to with raw HTTP/1.1.

use super::fixtures::TestBank;
use bb_05_api_gateway::{ApiGatewayService, GatewayConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const ADMIN_TOKEN: &str = "smoke-admin-token-0123456789";

async fn start() -> (Arc<ApiGatewayService>, SocketAddr, tokio::task::JoinHandle<()>) {
    let bank = TestBank::new();
    let mut config = GatewayConfig::default();
    config.auth.admin_token = Some(ADMIN_TOKEN.to_string());
    let gateway = Arc::new(
        ApiGatewayService::new(config, bank.container.gateway_services()).unwrap(),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = Arc::clone(&gateway);
    let task = tokio::spawn(async move {
        server.serve(listener).await.unwrap();
    });
    (gateway, addr, task)
}

/// Send one request with `Connection: close` and return the status code and
/// the raw response.
async fn get(addr: SocketAddr, path: &str, token: Option<&str>) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let auth = token
        .map(|t| format!("Authorization: Bearer {t}\r\n"))
        .unwrap_or_default();
    let request = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\n{auth}Connection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();
    let status = raw
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .unwrap_or(0);
    (status, raw)
}

#[tokio::test]
async fn test_served_over_tcp() {
    let (gateway, addr, task) = start().await;

    let (status, body) = get(addr, "/health", None).await;
    assert_eq!(status, 200, "{body}");

    let (status, body) = get(addr, "/api/units", None).await;
    assert_eq!(status, 401);
    assert!(body.contains("unauthorized"), "{body}");

    let (status, body) = get(addr, "/api/units?bloodType=O-", Some(ADMIN_TOKEN)).await;
    assert_eq!(status, 200, "{body}");

    gateway.shutdown_handle().shutdown();
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("server did not stop")
        .unwrap();
}

#[tokio::test]
async fn test_shutdown_before_first_request() {
    let (gateway, _addr, task) = start().await;
    gateway.shutdown();
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("server did not stop")
        .unwrap();
}
