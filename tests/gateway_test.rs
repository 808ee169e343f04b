//! End-to-end tests for the dispatch pipeline: registration, matching,
//! auth, and forwarding through real sockets.

use serde_json::{json, Value};

use api_gateway::auth::token;

mod common;

const SECRET: &str = "integration-secret";

async fn register_routes(client: &reqwest::Client, gateway: &str, routes: Value) {
    let res = client
        .post(format!("{gateway}/register"))
        .json(&json!({ "routes": routes }))
        .send()
        .await
        .expect("gateway unreachable");
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn test_private_route_with_valid_token_is_forwarded() {
    let backend = common::spawn_echo_backend().await;
    let (gateway, _shutdown) = common::spawn_gateway(SECRET).await;
    let client = reqwest::Client::new();

    register_routes(
        &client,
        &gateway,
        json!([{
            "method": "GET",
            "path": "/products",
            "targetUrl": format!("http://{backend}/products"),
            "public": false,
        }]),
    )
    .await;

    let jwt = token::issue("user123", SECRET, 3600).unwrap();
    let res = client
        .get(format!("{gateway}/products"))
        .bearer_auth(jwt)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["method"], "GET");
    assert_eq!(body["path"], "/products");
    // The caller's credential never reaches the backend.
    assert_eq!(body["authorization"], Value::Null);
    assert_eq!(body["contentType"], "application/json");
}

#[tokio::test]
async fn test_private_route_without_token_is_401() {
    let backend = common::spawn_echo_backend().await;
    let (gateway, _shutdown) = common::spawn_gateway(SECRET).await;
    let client = reqwest::Client::new();

    register_routes(
        &client,
        &gateway,
        json!([{
            "method": "GET",
            "path": "/products",
            "targetUrl": format!("http://{backend}/products"),
            "public": false,
        }]),
    )
    .await;

    let res = client.get(format!("{gateway}/products")).send().await.unwrap();
    assert_eq!(res.status(), 401);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Access Denied: No Token Provided");
}

#[tokio::test]
async fn test_private_route_with_bad_token_is_403() {
    let backend = common::spawn_echo_backend().await;
    let (gateway, _shutdown) = common::spawn_gateway(SECRET).await;
    let client = reqwest::Client::new();

    register_routes(
        &client,
        &gateway,
        json!([{
            "method": "GET",
            "path": "/products",
            "targetUrl": format!("http://{backend}/products"),
            "public": false,
        }]),
    )
    .await;

    // Signed with the wrong secret.
    let jwt = token::issue("user123", "some-other-secret", 3600).unwrap();
    let res = client
        .get(format!("{gateway}/products"))
        .bearer_auth(jwt)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 403);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Access Denied: Invalid Token");
}

#[tokio::test]
async fn test_public_route_needs_no_token_and_ignores_bogus_one() {
    let backend = common::spawn_echo_backend().await;
    let (gateway, _shutdown) = common::spawn_gateway(SECRET).await;
    let client = reqwest::Client::new();

    register_routes(
        &client,
        &gateway,
        json!([{
            "method": "POST",
            "path": "/login",
            "targetUrl": format!("http://{backend}/login"),
            "public": true,
        }]),
    )
    .await;

    let res = client.post(format!("{gateway}/login")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    let res = client
        .post(format!("{gateway}/login"))
        .bearer_auth("complete-garbage")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn test_dynamic_route_rewrites_target() {
    let backend = common::spawn_echo_backend().await;
    let (gateway, _shutdown) = common::spawn_gateway(SECRET).await;
    let client = reqwest::Client::new();

    register_routes(
        &client,
        &gateway,
        json!([{
            "method": "PUT",
            "path": "/products/:id",
            "targetUrl": format!("http://{backend}/products/:id"),
            "public": true,
        }]),
    )
    .await;

    let res = client
        .put(format!("{gateway}/products/42"))
        .body(r#"{"name":"widget"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["method"], "PUT");
    assert_eq!(body["path"], "/products/42");
    assert_eq!(body["body"], r#"{"name":"widget"}"#);
}

#[tokio::test]
async fn test_unregistered_method_path_is_404() {
    let backend = common::spawn_echo_backend().await;
    let (gateway, _shutdown) = common::spawn_gateway(SECRET).await;
    let client = reqwest::Client::new();

    register_routes(
        &client,
        &gateway,
        json!([{
            "method": "PUT",
            "path": "/products/:id",
            "targetUrl": format!("http://{backend}/products/:id"),
            "public": true,
        }]),
    )
    .await;

    // Same path shape, different method: no DELETE route is registered.
    let res = client
        .delete(format!("{gateway}/products/7"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_reregistration_switches_target() {
    let old_backend = common::spawn_fixed_backend(200, "old").await;
    let new_backend = common::spawn_fixed_backend(200, "new").await;
    let (gateway, _shutdown) = common::spawn_gateway(SECRET).await;
    let client = reqwest::Client::new();

    register_routes(
        &client,
        &gateway,
        json!([{
            "method": "GET",
            "path": "/who",
            "targetUrl": format!("http://{old_backend}/"),
            "public": true,
        }]),
    )
    .await;

    let res = client.get(format!("{gateway}/who")).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "old");

    register_routes(
        &client,
        &gateway,
        json!([{
            "method": "GET",
            "path": "/who",
            "targetUrl": format!("http://{new_backend}/"),
            "public": true,
        }]),
    )
    .await;

    // Last write wins: the old target must never be used again.
    for _ in 0..5 {
        let res = client.get(format!("{gateway}/who")).send().await.unwrap();
        assert_eq!(res.text().await.unwrap(), "new");
    }
}

#[tokio::test]
async fn test_backend_status_relayed_verbatim() {
    let backend = common::spawn_fixed_backend(418, "teapot says no").await;
    let (gateway, _shutdown) = common::spawn_gateway(SECRET).await;
    let client = reqwest::Client::new();

    register_routes(
        &client,
        &gateway,
        json!([{
            "method": "GET",
            "path": "/brew",
            "targetUrl": format!("http://{backend}/"),
            "public": true,
        }]),
    )
    .await;

    let res = client.get(format!("{gateway}/brew")).send().await.unwrap();
    assert_eq!(res.status(), 418);
    assert_eq!(res.text().await.unwrap(), "teapot says no");
}

#[tokio::test]
async fn test_unreachable_backend_is_500_with_generic_body() {
    let (gateway, _shutdown) = common::spawn_gateway(SECRET).await;
    let client = reqwest::Client::new();

    // Nothing listens on this port.
    register_routes(
        &client,
        &gateway,
        json!([{
            "method": "GET",
            "path": "/dead",
            "targetUrl": "http://127.0.0.1:1/dead",
            "public": true,
        }]),
    )
    .await;

    let res = client.get(format!("{gateway}/dead")).send().await.unwrap();
    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Internal Service Error");
}

#[tokio::test]
async fn test_register_without_routes_list_is_400() {
    let (gateway, _shutdown) = common::spawn_gateway(SECRET).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{gateway}/register"))
        .json(&json!({ "not_routes": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "No routes provided");
}

#[tokio::test]
async fn test_register_acknowledges_with_route_count() {
    let backend = common::spawn_echo_backend().await;
    let (gateway, _shutdown) = common::spawn_gateway(SECRET).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{gateway}/register"))
        .json(&json!({ "routes": [
            {"method": "GET", "path": "/a", "targetUrl": format!("http://{backend}/a")},
            {"method": "GET", "path": "/b", "targetUrl": format!("http://{backend}/b")},
        ]}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "registered");
    assert_eq!(body["routes"], 2);
}

#[tokio::test]
async fn test_trailing_slash_is_not_normalized() {
    let backend = common::spawn_echo_backend().await;
    let (gateway, _shutdown) = common::spawn_gateway(SECRET).await;
    let client = reqwest::Client::new();

    register_routes(
        &client,
        &gateway,
        json!([{
            "method": "GET",
            "path": "/products",
            "targetUrl": format!("http://{backend}/products"),
            "public": true,
        }]),
    )
    .await;

    let res = client
        .get(format!("{gateway}/products/"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
}
