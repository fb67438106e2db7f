// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Launcher authentication
//!
//! - `authenticate`: one-shot `/auth` handshake producing a [`Session`]
//! - `is_session_valid`: cheap probe of the current token
//! - `ensure_authenticated`: probe, and on failure replace the session with a
//!   fresh handshake

use super::{ClientError, GatewayClient, LogicalRequest};
use crate::crypto::{b64, open_session_key, HandshakeKeys};
use crate::session::Session;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Permission granting access to the user's SAFE drive
pub const SAFE_DRIVE_ACCESS: &str = "SAFE_DRIVE_ACCESS";

const AUTH_PATH: &str = "/auth";

/// Application identity shown to the user at the launcher prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    pub name: String,
    pub id: String,
    pub version: String,
    pub vendor: String,
}

impl AppInfo {
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        version: impl Into<String>,
        vendor: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            version: version.into(),
            vendor: vendor.into(),
        }
    }
}

/// Parameters of one handshake
#[derive(Debug, Clone)]
pub struct HandshakeRequest {
    pub app: AppInfo,
    pub permissions: Vec<String>,
    /// Caller-supplied keys; generated fresh when absent
    pub keys: Option<HandshakeKeys>,
}

impl HandshakeRequest {
    pub fn new(app: AppInfo, permissions: Vec<String>) -> Self {
        Self {
            app,
            permissions,
            keys: None,
        }
    }

    pub fn with_keys(mut self, keys: HandshakeKeys) -> Self {
        self.keys = Some(keys);
        self
    }
}

/// `/auth` request body
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequestBody {
    pub app: AppInfo,
    /// Always an array; the launcher rejects a missing or null field
    pub permissions: Vec<String>,
    #[serde(with = "b64")]
    pub public_key: Vec<u8>,
    #[serde(with = "b64")]
    pub nonce: Vec<u8>,
}

/// `/auth` response body
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseBody {
    pub token: String,
    #[serde(with = "b64")]
    pub encrypted_key: Vec<u8>,
    #[serde(with = "b64")]
    pub public_key: Vec<u8>,
}

impl GatewayClient {
    /// Run the `/auth` handshake
    ///
    /// Does not touch the client's session store; see
    /// [`ensure_authenticated`](Self::ensure_authenticated).
    ///
    /// # Errors
    ///
    /// - [`ClientError::AuthDenied`] when the user rejects the request (401)
    /// - [`ClientError::Api`] for any other non-2xx
    /// - [`ClientError::SessionDecrypt`] when the sealed key fails to open
    pub async fn authenticate(&self, request: HandshakeRequest) -> Result<Session, ClientError> {
        let keys = match request.keys {
            Some(keys) => keys,
            None => HandshakeKeys::generate().map_err(ClientError::RandomSource)?,
        };

        let body = AuthRequestBody {
            app: request.app,
            permissions: request.permissions,
            public_key: keys.public_key().to_vec(),
            nonce: keys.nonce().to_vec(),
        };
        let call = LogicalRequest::post(AUTH_PATH)
            .json(&body)?
            .skip_encryption()
            .skip_auth();

        info!("Requesting launcher authorization for app '{}'", body.app.id);
        let response = match self.execute(call).await {
            Ok(response) => response,
            Err(ClientError::Api(api)) if api.status == StatusCode::UNAUTHORIZED => {
                warn!("Launcher denied authorization for app '{}'", body.app.id);
                return Err(ClientError::AuthDenied);
            }
            Err(e) => return Err(e),
        };

        let reply: AuthResponseBody =
            serde_json::from_slice(&response.body).map_err(ClientError::ResponseDecode)?;
        let opened = open_session_key(&reply.encrypted_key, &reply.public_key, &keys)
            .map_err(ClientError::SessionDecrypt)?;

        Session::from_opened_key(reply.token, &opened).map_err(ClientError::SessionDecrypt)
    }

    /// Whether the gateway still accepts the current token
    ///
    /// No session means `Ok(false)` without a network call. A 401 is a normal
    /// answer (`Ok(false)`), not an error.
    pub async fn is_session_valid(&self) -> Result<bool, ClientError> {
        if !self.session_store().is_authenticated().await {
            return Ok(false);
        }

        match self.execute(LogicalRequest::get(AUTH_PATH).skip_encryption()).await {
            Ok(response) => Ok(response.status == StatusCode::OK),
            Err(ClientError::Api(api)) if api.status == StatusCode::UNAUTHORIZED => {
                debug!("Gateway token no longer accepted");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Make sure the client holds a session the gateway accepts
    ///
    /// Concurrent callers are serialized; only one handshake runs at a time.
    pub async fn ensure_authenticated(
        &self,
        app: &AppInfo,
        permissions: &[String],
    ) -> Result<(), ClientError> {
        let _guard = self.auth_lock.lock().await;

        if self.is_session_valid().await? {
            return Ok(());
        }

        self.session_store().clear().await;
        let session = self
            .authenticate(HandshakeRequest::new(app.clone(), permissions.to_vec()))
            .await?;
        self.session_store().replace(session).await;
        Ok(())
    }
}
