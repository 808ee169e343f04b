//! Backend-side registration client.
//!
//! The gateway's registry is in-memory only, so a gateway restart silently
//! drops every route. Backends heal this by announcing their routes through
//! this client on startup and retrying on any failure, without needing a
//! restart of their own.

use std::time::Duration;

use reqwest::Client;
use serde_json::json;

use crate::registration::backoff::calculate_backoff;
use crate::routing::RouteDescriptor;

/// Registration failure after exhausting the attempt bound.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("gateway rejected registration with status {0}")]
    Rejected(reqwest::StatusCode),

    #[error("could not reach gateway: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gave up after {0} attempts")]
    AttemptsExhausted(u32),
}

/// Announces a backend's routes to the gateway, retrying until accepted.
pub struct RegistrationClient {
    client: Client,
    gateway_url: String,
    base_delay_ms: u64,
    max_delay_ms: u64,
}

impl RegistrationClient {
    /// Create a client for the gateway at `gateway_url` (no trailing slash).
    pub fn new(gateway_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            gateway_url: gateway_url.into(),
            base_delay_ms: 500,
            max_delay_ms: 10_000,
        }
    }

    /// Override the retry backoff window.
    pub fn with_backoff(mut self, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        self.base_delay_ms = base_delay_ms;
        self.max_delay_ms = max_delay_ms;
        self
    }

    /// Single registration attempt.
    pub async fn register_once(
        &self,
        routes: &[RouteDescriptor],
    ) -> Result<(), RegistrationError> {
        let response = self
            .client
            .post(format!("{}/register", self.gateway_url))
            .json(&json!({ "routes": routes }))
            .timeout(Duration::from_secs(5))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(routes = routes.len(), gateway = %self.gateway_url, "Registered with gateway");
            Ok(())
        } else {
            Err(RegistrationError::Rejected(status))
        }
    }

    /// Register, retrying with backoff on any failure.
    ///
    /// `max_attempts` of `None` retries forever, which is the intended mode
    /// for long-lived backends: it keeps healing gateway restarts.
    pub async fn register_with_retry(
        &self,
        routes: &[RouteDescriptor],
        max_attempts: Option<u32>,
    ) -> Result<(), RegistrationError> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.register_once(routes).await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    if let Some(bound) = max_attempts {
                        if attempt >= bound {
                            tracing::error!(attempts = attempt, error = %err, "Registration failed, giving up");
                            return Err(RegistrationError::AttemptsExhausted(attempt));
                        }
                    }
                    let delay = calculate_backoff(attempt, self.base_delay_ms, self.max_delay_ms);
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Gateway registration failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
