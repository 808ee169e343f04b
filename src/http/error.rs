//! Gateway-originated error responses.
//!
//! Backend responses are relayed verbatim and never pass through here; this
//! covers only failures the gateway itself produces. Every one of them is
//! surfaced to the caller as a JSON body with a short `error` message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::auth::AuthError;
use crate::proxy::ProxyError;

/// Everything that can terminate a request inside the gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("no route registered for request")]
    NoRouteMatch,

    #[error("no token provided")]
    AuthMissing,

    #[error("invalid token")]
    AuthInvalid,

    /// Transport failure before any backend response was obtained. The
    /// detail is logged for operators and never shown to the caller.
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(#[source] ProxyError),

    #[error("malformed registration: {0}")]
    RegistrationMalformed(String),
}

impl From<AuthError> for GatewayError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NoToken => GatewayError::AuthMissing,
            AuthError::InvalidToken => GatewayError::AuthInvalid,
        }
    }
}

impl GatewayError {
    /// Status code presented to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::NoRouteMatch => StatusCode::NOT_FOUND,
            GatewayError::AuthMissing => StatusCode::UNAUTHORIZED,
            GatewayError::AuthInvalid => StatusCode::FORBIDDEN,
            GatewayError::UpstreamUnreachable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::RegistrationMalformed(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Caller-facing message. Transport detail is deliberately generic.
    fn message(&self) -> String {
        match self {
            GatewayError::NoRouteMatch => {
                "Endpoint not found or not registered via Gateway".to_string()
            }
            GatewayError::AuthMissing => "Access Denied: No Token Provided".to_string(),
            GatewayError::AuthInvalid => "Access Denied: Invalid Token".to_string(),
            GatewayError::UpstreamUnreachable(_) => "Internal Service Error".to_string(),
            GatewayError::RegistrationMalformed(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}
