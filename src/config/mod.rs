//! Gateway configuration: schema, loading, validation.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{config_from_env, load_config, ConfigError};
pub use schema::{AuthConfig, GatewayConfig, ListenerConfig, ObservabilityConfig, UpstreamConfig};
