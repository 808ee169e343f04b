//! Route registration client for backend services.

pub mod backoff;
pub mod client;

pub use client::{RegistrationClient, RegistrationError};
