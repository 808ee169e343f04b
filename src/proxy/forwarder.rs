//! Upstream forwarding.
//!
//! # Responsibilities
//! - Rewrite the target URL pattern with captured path parameters
//! - Relay the request to the backend with a single attempt
//! - Hand the backend response back untouched, or surface a transport error
//!
//! # Design Decisions
//! - Substitution is purely textual; a `:name` placeholder with no captured
//!   value is left as a literal in the outbound URL (long-standing gateway
//!   behavior that registered backends may rely on)
//! - Only `Content-Type: application/json` is sent upstream; inbound headers,
//!   including Authorization, are dropped because the gateway has already
//!   authenticated the caller
//! - A bounded timeout wraps the call so a hung backend cannot hold the
//!   request slot forever; expiry is reported like any other transport failure

use std::collections::HashMap;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, Uri};
use hyper::body::Incoming;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;

/// Transport-level forwarding failure. Backend responses, whatever their
/// status, are never errors.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("target URL is not a valid URI: {0}")]
    InvalidTarget(#[from] axum::http::uri::InvalidUri),

    #[error("could not build outbound request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("upstream request timed out after {0:?}")]
    Timeout(Duration),
}

/// Substitute each captured parameter into the target URL pattern.
///
/// Every `:name` occurrence is replaced by the captured value for `name`.
/// Placeholders without a captured counterpart stay literal. Longer names
/// substitute first so `:id` can never clobber the prefix of `:idx`, and
/// ties break alphabetically to keep the result deterministic.
pub fn rewrite_target(target_url: &str, params: &HashMap<String, String>) -> String {
    let mut names: Vec<&String> = params.keys().collect();
    names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut url = target_url.to_string();
    for name in names {
        url = url.replace(&format!(":{name}"), &params[name]);
    }
    url
}

/// Issues outbound requests to backend targets.
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
}

impl Forwarder {
    /// Create a forwarder with a bounded per-request timeout.
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { client, timeout }
    }

    /// Relay a request to `target` with the original method and body.
    ///
    /// One attempt only; the dispatcher translates any error into a generic
    /// internal-error response.
    pub async fn forward(
        &self,
        target: &str,
        method: Method,
        body: axum::body::Bytes,
    ) -> Result<Response<Incoming>, ProxyError> {
        let uri: Uri = target.parse()?;

        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))?;

        match tokio::time::timeout(self.timeout, self.client.request(request)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(err)) => Err(ProxyError::Upstream(err)),
            Err(_) => Err(ProxyError::Timeout(self.timeout)),
        }
    }
}
