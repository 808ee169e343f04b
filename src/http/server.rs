//! HTTP server setup and per-request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router: the registration endpoint plus a catch-all
//!   dispatcher for proxied traffic
//! - Wire up middleware (tracing, timeout, request ID)
//! - Orchestrate each inbound request: match → authorize → forward → relay
//!
//! # Design Decisions
//! - Registration bypasses matching and auth entirely; it talks straight to
//!   the registry and answers with a fixed acknowledgement
//! - Routing and auth failures are terminal; forwarding always ends in a
//!   response (relay or generic 500), never a retry

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::rejection::JsonRejection,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::auth::AuthGate;
use crate::config::GatewayConfig;
use crate::http::error::GatewayError;
use crate::observability::metrics;
use crate::proxy::{rewrite_target, Forwarder};
use crate::routing::{match_route, RouteDescriptor, RouteRegistry};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RouteRegistry>,
    pub gate: Arc<AuthGate>,
    pub forwarder: Arc<Forwarder>,
    pub max_body_bytes: usize,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    registry: Arc<RouteRegistry>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Self {
        let registry = Arc::new(RouteRegistry::new());
        let gate = Arc::new(AuthGate::new(
            &config.auth.jwt_secret,
            config.auth.leeway_secs,
        ));
        let forwarder = Arc::new(Forwarder::new(Duration::from_secs(
            config.upstream.timeout_secs,
        )));

        let state = AppState {
            registry: registry.clone(),
            gate,
            forwarder,
            max_body_bytes: config.upstream.max_body_bytes,
        };

        let router = Self::build_router(&config, state);
        Self { router, registry }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/register", post(register_handler))
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// The registry backing this server, for inspection in tests.
    pub fn registry(&self) -> Arc<RouteRegistry> {
        self.registry.clone()
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Gateway listening");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("Gateway stopped");
        Ok(())
    }
}

/// Registration payload: a list of route descriptors.
#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    routes: Option<Vec<RouteDescriptor>>,
}

/// Handle `POST /register` from backends.
///
/// Entries are processed independently; a malformed descriptor in the batch
/// is skipped, never corrupting existing registrations.
async fn register_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegisterPayload>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let Json(payload) = payload
        .map_err(|rejection| GatewayError::RegistrationMalformed(rejection.body_text()))?;

    let routes = payload
        .routes
        .ok_or_else(|| GatewayError::RegistrationMalformed("No routes provided".into()))?;

    let accepted = state.registry.register(routes);
    Ok(Json(json!({
        "status": "registered",
        "routes": state.registry.len(),
        "accepted": accepted,
    })))
}

/// Catch-all dispatcher for proxied traffic.
///
/// Per-request state machine: Routing → Authorizing → Forwarding →
/// Responded, with early rejection from the first two stages.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let method_str = method.to_string();
    let path = request.uri().path().to_string();

    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    // 1. Routing
    let snapshot = state.registry.snapshot();
    let matched = match match_route(method.as_str(), &path, &snapshot) {
        Some(m) => m,
        None => {
            tracing::warn!(request_id = %request_id, method = %method, path = %path, "No route matched");
            metrics::record_request(&method_str, 404, "no_route", start);
            return GatewayError::NoRouteMatch.into_response();
        }
    };

    // 2. Authorizing
    if let Err(err) = state.gate.authorize(&matched.route, request.headers()) {
        let gateway_err = GatewayError::from(err);
        let status = gateway_err.status().as_u16();
        tracing::warn!(request_id = %request_id, path = %path, error = %err, "Request rejected by auth gate");
        metrics::record_request(&method_str, status, "auth_denied", start);
        return gateway_err.into_response();
    }

    // 3. Forwarding
    let target = rewrite_target(&matched.route.target_url, &matched.params);
    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        target = %target,
        "Proxying request"
    );

    let body = match axum::body::to_bytes(request.into_body(), state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(request_id = %request_id, error = %err, "Failed to buffer request body");
            metrics::record_request(&method_str, 413, "body_too_large", start);
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(json!({ "error": "Request body too large" })),
            )
                .into_response();
        }
    };

    match state.forwarder.forward(&target, method, body).await {
        Ok(response) => {
            let status = response.status();
            metrics::record_request(&method_str, status.as_u16(), "relayed", start);

            // Relay the backend's status and body verbatim.
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body)).into_response()
        }
        Err(err) => {
            // Full transport detail stays in the logs; the caller only sees
            // a generic internal error.
            tracing::error!(request_id = %request_id, target = %target, error = %err, "Upstream unreachable");
            metrics::record_request(&method_str, 500, "upstream_unreachable", start);
            GatewayError::UpstreamUnreachable(err).into_response()
        }
    }
}
