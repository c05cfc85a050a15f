//! Shared DHIS2 HTTP client
//!
//! Both tracker instances speak the same API, so one thin client type wraps
//! a `reqwest::Client` with base-URL handling and basic-auth headers. The
//! origin and destination adapters layer their own semantics (and their own
//! error types) on top of it.

use crate::config::ServerConfig;
use crate::domain::{Result, SyncError};
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, ClientBuilder, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use std::time::Duration;

/// A basic-auth HTTP client bound to one DHIS2 instance.
#[derive(Debug, Clone)]
pub struct Dhis2Client {
    base_url: String,
    http: Client,
    auth_header: String,
}

impl Dhis2Client {
    /// Create a client from a server configuration section.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the underlying HTTP client cannot
    /// be built.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let http = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SyncError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        let credentials = format!(
            "{}:{}",
            config.username,
            config.password.expose_secret()
        );
        let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            auth_header: format!("Basic {encoded}"),
        })
    }

    /// Base URL of the instance (no trailing slash)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an `/api/...` path
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Authenticated GET request builder for an API path
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.http
            .get(self.api_url(path))
            .header("Authorization", &self.auth_header)
    }

    /// Authenticated POST request builder for an API path
    pub fn post(&self, path: &str) -> RequestBuilder {
        self.http
            .post(self.api_url(path))
            .header("Authorization", &self.auth_header)
    }

    /// Lightweight credential/connectivity probe against `/api/me`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Authentication`] on a 401/403 response and a
    /// generic error for any other failure. A successful probe means the
    /// credentials work and the instance is reachable.
    pub async fn probe(&self) -> Result<()> {
        let response = self
            .get("me")
            .send()
            .await
            .map_err(|e| SyncError::Other(format!("Connectivity probe failed: {e}")))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SyncError::Authentication(
                format!("Credential probe rejected by {}", self.base_url),
            )),
            status => Err(SyncError::Other(format!(
                "Connectivity probe to {} returned {status}",
                self.base_url
            ))),
        }
    }
}

/// Extract the server's `message` field from a structured error body,
/// falling back to the raw text when the body is not JSON.
pub(crate) fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| {
            if body.is_empty() {
                "No message body found".to_string()
            } else {
                body.to_string()
            }
        })
}
