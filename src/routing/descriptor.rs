//! Route descriptors as registered by backend services.

use serde::{Deserialize, Serialize};

/// A single registered route: an inbound (method, path pattern) mapped to a
/// backend target URL pattern and an access-control flag.
///
/// Path and target patterns may contain `:name` segments. The same names must
/// appear in both for parameter substitution to resolve; this is not enforced
/// at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteDescriptor {
    /// HTTP verb, compared case-sensitively against the request method.
    pub method: String,

    /// Path pattern, e.g. `/products/:id`.
    pub path: String,

    /// Backend URL pattern, e.g. `http://127.0.0.1:3001/products/:id`.
    #[serde(rename = "targetUrl")]
    pub target_url: String,

    /// Routes marked public skip the auth gate.
    #[serde(default)]
    pub public: bool,
}

impl RouteDescriptor {
    /// Registry key: at most one descriptor per (method, path) is active.
    pub fn key(&self) -> (&str, &str) {
        (&self.method, &self.path)
    }

    /// Minimal sanity check applied at registration.
    ///
    /// A descriptor that fails this is skipped with a warning; it never
    /// blocks the rest of a registration batch.
    pub fn is_well_formed(&self) -> bool {
        !self.method.is_empty() && self.path.starts_with('/') && !self.target_url.is_empty()
    }
}
