//! Dynamic routing: descriptors, registry, pattern matching.

pub mod descriptor;
pub mod matcher;
pub mod pattern;
pub mod registry;

pub use descriptor::RouteDescriptor;
pub use matcher::{match_route, RouteMatch};
pub use registry::{RegisteredRoute, RouteRegistry};
