// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the gateway client

use std::env;
use std::time::Duration;
use url::Url;

/// Launcher address used when nothing else is configured
pub const DEFAULT_LAUNCHER_URL: &str = "http://localhost:8100/";

/// Configuration for [`GatewayClient`](crate::client::GatewayClient)
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the launcher; request paths are joined onto its path
    pub base_url: String,
    /// Per-request timeout handed to the HTTP transport (None = no timeout)
    pub request_timeout_ms: Option<u64>,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("SAFE_LAUNCHER_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.base_url),
            request_timeout_ms: env::var("SAFE_REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|ms: &u64| *ms > 0)
                .or(defaults.request_timeout_ms),
            user_agent: defaults.user_agent,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Parse and check the base URL
    pub fn parsed_base_url(&self) -> Result<Url, String> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| format!("Invalid launcher base URL '{}': {}", self.base_url, e))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(format!(
                "Invalid launcher base URL '{}': unsupported scheme '{}'",
                self.base_url, other
            )),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.parsed_base_url()?;
        if self.request_timeout_ms == Some(0) {
            return Err("Request timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LAUNCHER_URL.to_string(),
            request_timeout_ms: None,
            user_agent: crate::version::user_agent(),
        }
    }
}
