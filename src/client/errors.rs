// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for gateway calls
//!
//! Nothing here is retried by the client. The variants split into:
//! - **AuthDenied**: the user rejected the app at the launcher prompt
//! - **SessionDecrypt / Decrypt**: integrity failures; discard the session
//! - **Api**: any status outside 200-299, with the readable body
//! - **Transport**: connection-level failures from the HTTP stack
//! - **ResponseDecode**: JSON was expected but the body did not parse

use crate::crypto::CryptoError;
use reqwest::StatusCode;
use std::fmt;
use thiserror::Error;

/// Non-2xx reply from the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    /// Response body after any envelope decryption
    pub body: Vec<u8>,
}

impl ApiError {
    pub fn new(status: StatusCode, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Server error {}: {}",
            self.status.as_u16(),
            self.body_text()
        )
    }
}

impl std::error::Error for ApiError {}

/// Errors returned by [`GatewayClient`](super::GatewayClient)
#[derive(Debug, Error)]
pub enum ClientError {
    /// Handshake rejected with 401; do not retry automatically
    #[error("Auth denied")]
    AuthDenied,

    /// The handshake's sealed session key failed to open
    #[error("Unable to decrypt session key: {0}")]
    SessionDecrypt(#[source] CryptoError),

    /// An encrypted response body failed to open under the session key
    #[error("Failed to decrypt response: {0}")]
    Decrypt(#[source] CryptoError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Unable to unmarshal JSON: {0}")]
    ResponseDecode(#[source] serde_json::Error),

    #[error("Unable to generate handshake keys: {0}")]
    RandomSource(#[source] CryptoError),

    /// Encryption was requested but the client holds no session
    #[error("No gateway session; authenticate first")]
    NoSession,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    pub fn is_auth_denied(&self) -> bool {
        matches!(self, ClientError::AuthDenied)
    }

    /// HTTP status for `Api` errors
    pub fn api_status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api(api) => Some(api.status),
            _ => None,
        }
    }

    /// True when the session's keys can no longer be trusted
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            ClientError::SessionDecrypt(_) | ClientError::Decrypt(_)
        )
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(Box::new(err))
    }
}
