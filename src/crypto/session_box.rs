// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Handshake Key Box
//!
//! The gateway answers `/auth` with the session's symmetric key and nonce
//! sealed in a NaCl `box` (X25519 + XSalsa20-Poly1305) addressed to the
//! client's ephemeral public key, using the nonce the client put in the
//! request.

use super::keypair::{HandshakeKeys, KEY_SIZE, NONCE_SIZE};
use super::CryptoError;
use crypto_box::{
    aead::{generic_array::GenericArray, Aead},
    PublicKey, SalsaBox, SecretKey,
};

/// Open the encrypted session key returned by the gateway
///
/// # Arguments
///
/// * `encrypted_key` - Sealed payload from the `encryptedKey` response field
/// * `server_public_key` - Gateway's public key from the `publicKey` response field
/// * `keys` - The client keys (private key and nonce) sent in the same request
///
/// # Errors
///
/// Returns [`CryptoError::DecryptionFailed`] when the authentication tag does
/// not verify; this must never be treated as a transient failure.
pub fn open_session_key(
    encrypted_key: &[u8],
    server_public_key: &[u8],
    keys: &HandshakeKeys,
) -> Result<Vec<u8>, CryptoError> {
    let server_public = parse_public_key(server_public_key, "server_public_key")?;
    let session_box = SalsaBox::new(&server_public, &keys.box_secret_key());

    session_box
        .decrypt(GenericArray::from_slice(keys.nonce()), encrypted_key)
        .map_err(|e| CryptoError::DecryptionFailed {
            operation: "session_key_open".to_string(),
            reason: format!("box authentication failed: {}", e),
        })
}

/// Seal a session key payload for a client
///
/// This is the gateway side of [`open_session_key`].
pub fn seal_session_key(
    payload: &[u8],
    client_public_key: &[u8],
    server_secret_key: &[u8; KEY_SIZE],
    nonce: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    if nonce.len() != NONCE_SIZE {
        return Err(CryptoError::InvalidNonce {
            expected_size: NONCE_SIZE,
            actual_size: nonce.len(),
        });
    }

    let client_public = parse_public_key(client_public_key, "client_public_key")?;
    let session_box = SalsaBox::new(&client_public, &SecretKey::from(*server_secret_key));

    session_box
        .encrypt(GenericArray::from_slice(nonce), payload)
        .map_err(|e| CryptoError::EncryptionFailed {
            operation: "session_key_seal".to_string(),
            reason: e.to_string(),
        })
}

fn parse_public_key(bytes: &[u8], key_type: &str) -> Result<PublicKey, CryptoError> {
    let raw: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| CryptoError::InvalidKey {
        key_type: key_type.to_string(),
        reason: format!("expected {} bytes, got {}", KEY_SIZE, bytes.len()),
    })?;
    Ok(PublicKey::from(raw))
}
