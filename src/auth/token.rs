//! Token issue and verification against the shared gateway secret.
//!
//! HS256 throughout: the gateway and whichever service issues tokens share
//! one symmetric secret. Verification only cares that the signature is good
//! and the token is not expired; claim contents are never inspected for
//! authorization decisions.

use jsonwebtoken::{
    decode, encode, get_current_timestamp, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::auth::AuthError;

/// Claims written by `issue`. Verification does not require this shape;
/// any payload with a valid signature and unexpired `exp` passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Principal identifier.
    pub sub: String,
    /// Issued-at, seconds since epoch.
    pub iat: u64,
    /// Expiry, seconds since epoch.
    pub exp: u64,
}

/// Sign a token for `sub`, valid for `ttl_secs` from now.
///
/// Backends minting tokens with the shared secret use the same layout; the
/// gateway itself only calls this from tests.
pub fn issue(sub: &str, secret: &str, ttl_secs: u64) -> Result<String, AuthError> {
    let now = get_current_timestamp();
    let claims = Claims {
        sub: sub.to_string(),
        iat: now,
        exp: now + ttl_secs,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Verify signature and expiry. Payload shape is deliberately untyped.
pub fn verify(token: &str, key: &DecodingKey, leeway_secs: u64) -> Result<(), AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = leeway_secs;
    decode::<serde_json::Value>(token, key, &validation)
        .map(|_| ())
        .map_err(|err| {
            tracing::debug!(error = %err, "Token verification failed");
            AuthError::InvalidToken
        })
}
