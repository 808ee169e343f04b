//! Proxying: target rewrite and upstream relay.

pub mod forwarder;

pub use forwarder::{rewrite_target, Forwarder, ProxyError};
