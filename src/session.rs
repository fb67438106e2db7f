// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Gateway Session
//!
//! A [`Session`] is the token, shared key and nonce produced by one
//! successful handshake. It is immutable once built; the [`SessionStore`]
//! swaps whole sessions in and out so callers never observe a token without
//! its key or a key without its nonce.

use crate::crypto::keypair::{KEY_SIZE, NONCE_SIZE};
use crate::crypto::CryptoError;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Authenticated session with the gateway
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    shared_key: [u8; KEY_SIZE],
    nonce: Vec<u8>,
}

impl Session {
    /// Build a session from its three parts
    ///
    /// The nonce may be longer than 24 bytes (the gateway hands out 32); only
    /// the first 24 are used by the envelope cipher.
    pub fn new(
        token: impl Into<String>,
        shared_key: &[u8],
        nonce: &[u8],
    ) -> Result<Self, CryptoError> {
        let token = token.into();
        if token.is_empty() {
            return Err(CryptoError::InvalidPayload {
                field: "token".to_string(),
                reason: "token is empty".to_string(),
            });
        }

        let shared_key: [u8; KEY_SIZE] =
            shared_key.try_into().map_err(|_| CryptoError::InvalidKey {
                key_type: "shared_key".to_string(),
                reason: format!("expected {} bytes, got {}", KEY_SIZE, shared_key.len()),
            })?;

        if nonce.len() < NONCE_SIZE {
            return Err(CryptoError::InvalidNonce {
                expected_size: NONCE_SIZE,
                actual_size: nonce.len(),
            });
        }

        Ok(Self {
            token,
            shared_key,
            nonce: nonce.to_vec(),
        })
    }

    /// Build a session from the opened handshake payload
    ///
    /// The first 32 bytes are the shared key, the remainder is the nonce.
    pub fn from_opened_key(token: impl Into<String>, opened: &[u8]) -> Result<Self, CryptoError> {
        if opened.len() < KEY_SIZE + NONCE_SIZE {
            return Err(CryptoError::InvalidPayload {
                field: "encryptedKey".to_string(),
                reason: format!(
                    "opened key is {} bytes, need at least {}",
                    opened.len(),
                    KEY_SIZE + NONCE_SIZE
                ),
            });
        }
        let (key, nonce) = opened.split_at(KEY_SIZE);
        Self::new(token, key, nonce)
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn shared_key(&self) -> &[u8; KEY_SIZE] {
        &self.shared_key
    }

    /// Nonce bytes exactly as the handshake delivered them
    pub fn nonce(&self) -> &[u8] {
        &self.nonce
    }

    /// The 24-byte nonce used for every envelope in this session
    pub fn envelope_nonce(&self) -> [u8; NONCE_SIZE] {
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&self.nonce[..NONCE_SIZE]);
        nonce
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token_len", &self.token.len())
            .field("shared_key", &"<redacted>")
            .field("nonce_len", &self.nonce.len())
            .finish()
    }
}

/// Holder of the client's current session
///
/// Cloning shares the underlying slot.
#[derive(Clone, Default)]
pub struct SessionStore {
    current: Arc<RwLock<Option<Arc<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            current: Arc::new(RwLock::new(Some(Arc::new(session)))),
        }
    }

    /// Snapshot of the current session, if any
    pub async fn current(&self) -> Option<Arc<Session>> {
        self.current.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Replace the whole session
    pub async fn replace(&self, session: Session) {
        let mut slot = self.current.write().await;
        *slot = Some(Arc::new(session));
        tracing::info!("🔑 Gateway session established");
    }

    /// Drop the current session
    pub async fn clear(&self) {
        let mut slot = self.current.write().await;
        if slot.take().is_some() {
            tracing::info!("🗑️  Gateway session cleared");
        }
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}
