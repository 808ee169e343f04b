//! The authentication gate applied to private routes.
//!
//! # Responsibilities
//! - Skip entirely for public routes
//! - Extract the bearer token from the Authorization header
//! - Verify signature and expiry against the shared secret
//!
//! # Design Decisions
//! - Token extraction takes the second whitespace-separated part of the
//!   header; a header with no token part counts as "no token" (401), while
//!   a present-but-unverifiable token is "invalid" (403)
//! - The gate never reads claims beyond validity; there is no
//!   authorization-by-claim

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use jsonwebtoken::DecodingKey;

use crate::auth::token;
use crate::auth::AuthError;
use crate::routing::RouteDescriptor;

/// Verifies bearer tokens for non-public routes.
pub struct AuthGate {
    decoding_key: DecodingKey,
    leeway_secs: u64,
}

impl AuthGate {
    /// Build a gate from the shared secret.
    pub fn new(secret: &str, leeway_secs: u64) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            leeway_secs,
        }
    }

    /// Authorize a request for the matched route.
    ///
    /// Public routes always pass, even when a (possibly bogus)
    /// Authorization header is supplied.
    pub fn authorize(&self, route: &RouteDescriptor, headers: &HeaderMap) -> Result<(), AuthError> {
        if route.public {
            return Ok(());
        }

        let token = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split_whitespace().nth(1))
            .ok_or(AuthError::NoToken)?;

        token::verify(token, &self.decoding_key, self.leeway_secs)
    }
}
