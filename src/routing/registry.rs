//! In-memory route registry.
//!
//! # Responsibilities
//! - Hold every active route descriptor for the process lifetime
//! - Upsert registrations: last write wins per (method, path) key
//! - Hand out consistent snapshots for matching
//!
//! # Design Decisions
//! - Readers never lock: the route list lives behind an `ArcSwap` and
//!   matching iterates a snapshot, so a concurrent registration can never
//!   expose a half-replaced entry
//! - Writers are serialized by a mutex; registration is rare compared to
//!   matching, so writer contention is irrelevant
//! - Insertion order is preserved (replacement appends), which keeps the
//!   first-match scan deterministic
//! - No persistence and no unregister: a restart empties the registry and
//!   backends are expected to re-register on their own retry loop

use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;

use crate::routing::descriptor::RouteDescriptor;
use crate::routing::pattern::CompiledPattern;

/// A registry entry: the descriptor as registered plus its pattern,
/// tokenized once at registration so matching never re-derives it.
#[derive(Debug, Clone)]
pub struct RegisteredRoute {
    descriptor: RouteDescriptor,
    pattern: CompiledPattern,
}

impl RegisteredRoute {
    /// Compile the descriptor's path pattern and pair them up.
    pub fn new(descriptor: RouteDescriptor) -> Self {
        let pattern = CompiledPattern::compile(&descriptor.path);
        Self { descriptor, pattern }
    }

    /// The descriptor as registered.
    pub fn descriptor(&self) -> &RouteDescriptor {
        &self.descriptor
    }

    /// The precompiled path pattern.
    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }
}

/// Shared registry of active routes.
#[derive(Debug)]
pub struct RouteRegistry {
    routes: ArcSwap<Vec<RegisteredRoute>>,
    write_lock: Mutex<()>,
}

impl RouteRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            routes: ArcSwap::from_pointee(Vec::new()),
            write_lock: Mutex::new(()),
        }
    }

    /// Register a batch of descriptors.
    ///
    /// Each entry independently replaces any existing descriptor with the
    /// same (method, path) key and is appended at the end. Malformed entries
    /// are skipped with a warning and do not affect the rest of the batch.
    ///
    /// Returns the number of descriptors accepted.
    pub fn register(&self, descriptors: Vec<RouteDescriptor>) -> usize {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut routes: Vec<RegisteredRoute> = self.routes.load().as_ref().clone();
        let mut accepted = 0;

        for descriptor in descriptors {
            if !descriptor.is_well_formed() {
                tracing::warn!(
                    method = %descriptor.method,
                    path = %descriptor.path,
                    "Skipping malformed route descriptor"
                );
                continue;
            }
            routes.retain(|existing| existing.descriptor().key() != descriptor.key());
            routes.push(RegisteredRoute::new(descriptor));
            accepted += 1;
        }

        let total = routes.len();
        self.routes.store(Arc::new(routes));

        tracing::info!(routes_active = total, accepted, "Registry updated");
        accepted
    }

    /// Take a consistent snapshot of the current routes, in scan order.
    pub fn snapshot(&self) -> Arc<Vec<RegisteredRoute>> {
        self.routes.load_full()
    }

    /// Number of active routes.
    pub fn len(&self) -> usize {
        self.routes.load().len()
    }

    /// True when no routes have been registered yet.
    pub fn is_empty(&self) -> bool {
        self.routes.load().is_empty()
    }
}

impl Default for RouteRegistry {
    fn default() -> Self {
        Self::new()
    }
}
