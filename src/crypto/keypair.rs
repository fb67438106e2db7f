// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Ephemeral Handshake Keys
//!
//! Generates the X25519 key pair and the 24-byte nonce a client sends in the
//! `/auth` handshake. All three values are produced together and travel
//! together: the gateway seals its reply with the nonce from the same request,
//! so a key pair is never paired with a nonce from another attempt.

use super::CryptoError;
use crypto_box::SecretKey;
use rand::{rngs::OsRng, RngCore};
use std::fmt;

/// Size of an X25519 public or private key
pub const KEY_SIZE: usize = 32;

/// Size of an XSalsa20 nonce
pub const NONCE_SIZE: usize = 24;

/// Key material for one handshake attempt
#[derive(Clone, PartialEq, Eq)]
pub struct HandshakeKeys {
    public_key: [u8; KEY_SIZE],
    secret_key: [u8; KEY_SIZE],
    nonce: [u8; NONCE_SIZE],
}

impl HandshakeKeys {
    /// Generate fresh keys from the operating system CSPRNG
    pub fn generate() -> Result<Self, CryptoError> {
        Self::generate_with(&mut OsRng)
    }

    /// Generate fresh keys from the given random source
    ///
    /// Errors from the source are returned as [`CryptoError::RandomSource`];
    /// no weaker source is ever substituted.
    pub fn generate_with<R: RngCore + ?Sized>(rng: &mut R) -> Result<Self, CryptoError> {
        let mut secret_key = [0u8; KEY_SIZE];
        rng.try_fill_bytes(&mut secret_key)?;

        let mut nonce = [0u8; NONCE_SIZE];
        rng.try_fill_bytes(&mut nonce)?;

        Ok(Self::from_secret(secret_key, nonce))
    }

    /// Build keys from a caller-held private key and nonce
    ///
    /// The public key is always derived from the private key, so a mismatched
    /// pair cannot be expressed.
    pub fn from_secret(secret_key: [u8; KEY_SIZE], nonce: [u8; NONCE_SIZE]) -> Self {
        let public_key = *SecretKey::from(secret_key).public_key().as_bytes();
        Self {
            public_key,
            secret_key,
            nonce,
        }
    }

    pub fn public_key(&self) -> &[u8; KEY_SIZE] {
        &self.public_key
    }

    pub fn secret_key(&self) -> &[u8; KEY_SIZE] {
        &self.secret_key
    }

    pub fn nonce(&self) -> &[u8; NONCE_SIZE] {
        &self.nonce
    }

    pub(crate) fn box_secret_key(&self) -> SecretKey {
        SecretKey::from(self.secret_key)
    }
}

impl fmt::Debug for HandshakeKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandshakeKeys")
            .field("public_key", &hex_prefix(&self.public_key))
            .field("secret_key", &"<redacted>")
            .field("nonce", &hex_prefix(&self.nonce))
            .finish()
    }
}

fn hex_prefix(bytes: &[u8]) -> String {
    format!("{}..", hex::encode(&bytes[..4.min(bytes.len())]))
}
