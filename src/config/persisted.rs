// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Session state that callers may keep between process runs
//!
//! The JSON layout matches what earlier launcher clients wrote
//! (`launcherServer`, `token`, `sharedKey`, `nonce`), so existing files keep
//! working. Where the file lives is up to the caller.

use crate::crypto::CryptoError;
use crate::session::Session;
use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;

/// Base URL plus the three session values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    #[serde(
        rename = "launcherServer",
        alias = "baseUrl",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub base_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,
    #[serde(
        rename = "sharedKey",
        default,
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "encode_bytes",
        deserialize_with = "decode_bytes"
    )]
    pub shared_key: Vec<u8>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "encode_bytes",
        deserialize_with = "decode_bytes"
    )]
    pub nonce: Vec<u8>,
}

impl PersistedSession {
    pub fn from_session(base_url: impl Into<String>, session: Option<&Session>) -> Self {
        match session {
            Some(session) => Self {
                base_url: base_url.into(),
                token: session.token().to_string(),
                shared_key: session.shared_key().to_vec(),
                nonce: session.nonce().to_vec(),
            },
            None => Self {
                base_url: base_url.into(),
                ..Self::default()
            },
        }
    }

    /// Rebuild the session; an empty token means "not authenticated"
    pub fn session(&self) -> Result<Option<Session>, CryptoError> {
        if self.token.is_empty() {
            return Ok(None);
        }
        Session::new(self.token.clone(), &self.shared_key, &self.nonce).map(Some)
    }

    /// Read a persisted session; a missing file yields the empty state
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let bytes = std::fs::read(path)
            .with_context(|| format!("Unable to read session file {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("Invalid session file {}", path.display()))
    }

    /// Write the session as JSON, readable only by the owner on unix
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = serde_json::to_vec(self)?;
        std::fs::write(path, bytes)
            .with_context(|| format!("Unable to write session file {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }
}

// Empty byte fields are skipped on write, so only non-empty values reach these
fn encode_bytes<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(bytes))
}

fn decode_bytes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let encoded: Option<String> = Option::deserialize(deserializer)?;
    match encoded {
        Some(s) => STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom),
        None => Ok(Vec::new()),
    }
}
