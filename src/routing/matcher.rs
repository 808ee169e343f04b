//! Request-to-route matching.
//!
//! # Responsibilities
//! - Scan a registry snapshot in insertion order
//! - Filter by method (exact, case-sensitive)
//! - Try the exact-path fast path, then the precompiled pattern
//! - Extract dynamic segment values on a pattern match
//!
//! # Design Decisions
//! - First match wins; there is no specificity ranking, so an exact route
//!   and an overlapping dynamic route resolve purely by registration order
//! - Patterns are tokenized once at registration and reused here; the scan
//!   itself never compiles anything
//! - The exact-string comparison short-circuits pattern matching for
//!   static routes, the common case

use std::collections::HashMap;

use crate::routing::descriptor::RouteDescriptor;
use crate::routing::registry::RegisteredRoute;

/// Result of a successful match: the route plus captured parameters.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub route: RouteDescriptor,
    pub params: HashMap<String, String>,
}

/// Find the first route in scan order matching the request method and path.
pub fn match_route(method: &str, path: &str, routes: &[RegisteredRoute]) -> Option<RouteMatch> {
    for entry in routes {
        let route = entry.descriptor();
        if route.method != method {
            continue;
        }

        if route.path == path {
            return Some(RouteMatch {
                route: route.clone(),
                params: HashMap::new(),
            });
        }

        let pattern = entry.pattern();
        if !pattern.has_params() {
            continue;
        }
        if let Some(params) = pattern.match_path(path) {
            return Some(RouteMatch {
                route: route.clone(),
                params,
            });
        }
    }
    None
}
