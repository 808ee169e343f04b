//! Dynamic-registration API gateway.
//!
//! A single front door for HTTP traffic: backends register their routes at
//! startup, and the gateway matches each inbound request against the
//! registry, enforces a bearer-token check on private routes, and relays the
//! request to the owning backend.
//!
//! # Request flow
//!
//! ```text
//! inbound request
//!     │
//!     ├── POST /register ──────────────▶ routing::registry (upsert, ack)
//!     │
//!     └── anything else
//!            │
//!            ▼
//!        routing::matcher ── no match ──▶ 404
//!            │
//!            ▼
//!        auth::gate ─── missing token ──▶ 401
//!            │      └── invalid token ──▶ 403
//!            ▼
//!        proxy::forwarder ── transport ─▶ 500
//!            │                failure
//!            ▼
//!        backend response relayed verbatim
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod proxy;
pub mod routing;

// Access control
pub mod auth;

// Backend-side collaborator
pub mod registration;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
