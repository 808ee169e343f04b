//! HTTP surface: server, dispatcher, error responses.

pub mod error;
pub mod server;

pub use error::GatewayError;
pub use server::HttpServer;
