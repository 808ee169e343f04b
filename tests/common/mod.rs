//! Shared utilities for gateway integration tests.

use std::net::SocketAddr;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::IntoResponse,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;

use api_gateway::lifecycle::Shutdown;
use api_gateway::{GatewayConfig, HttpServer};

/// Start a backend that echoes method, path, body, and selected headers as
/// JSON. Returns the bound address.
#[allow(dead_code)]
pub async fn spawn_echo_backend() -> SocketAddr {
    let app = Router::new().fallback(echo_handler);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

async fn echo_handler(request: Request<Body>) -> impl IntoResponse {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let authorization = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let content_type = request
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let body = axum::body::to_bytes(request.into_body(), 1024 * 1024)
        .await
        .unwrap_or_default();

    Json(json!({
        "method": method,
        "path": path,
        "authorization": authorization,
        "contentType": content_type,
        "body": String::from_utf8_lossy(&body),
    }))
}

/// Start a backend that answers every request with a fixed status and body.
#[allow(dead_code)]
pub async fn spawn_fixed_backend(status: u16, body: &'static str) -> SocketAddr {
    let status = StatusCode::from_u16(status).unwrap();
    let app = Router::new().fallback(move || async move { (status, body) });
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

/// Start a gateway on an ephemeral port with the given shared secret.
/// Returns the base URL and the shutdown handle keeping it alive.
#[allow(dead_code)]
pub async fn spawn_gateway(secret: &str) -> (String, Shutdown) {
    let mut config = GatewayConfig::default();
    config.auth.jwt_secret = secret.to_string();
    config.upstream.timeout_secs = 5;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (format!("http://{addr}"), shutdown)
}
