//! Bearer-token authentication for private routes.

pub mod gate;
pub mod token;

pub use gate::AuthGate;

/// Why the auth gate denied a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header, or no token part in it.
    #[error("no token provided")]
    NoToken,
    /// Token present but malformed, badly signed, or expired.
    #[error("invalid token")]
    InvalidToken,
}
