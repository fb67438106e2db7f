//! Session Envelope (XSalsa20-Poly1305 secretbox)
//!
//! Encrypts and decrypts request/response payloads under the session's shared
//! key. The output layout matches NaCl `secretbox`: 16-byte Poly1305 tag
//! followed by the ciphertext.
//!
//! # Known weakness
//!
//! The gateway protocol uses ONE nonce for every message of a session, so two
//! envelopes sealed under the same session share a keystream. This is kept
//! as-is because the gateway decrypts with that same fixed nonce; changing it
//! would break interoperability.

use super::CryptoError;
use crate::session::Session;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use crypto_secretbox::{
    aead::{generic_array::GenericArray, Aead, KeyInit},
    XSalsa20Poly1305,
};

/// Encrypts and decrypts payloads for one session
pub struct EnvelopeCodec {
    cipher: XSalsa20Poly1305,
    nonce: [u8; 24],
}

impl EnvelopeCodec {
    /// Bind a codec to a populated session
    pub fn new(session: &Session) -> Self {
        Self {
            cipher: XSalsa20Poly1305::new(GenericArray::from_slice(session.shared_key())),
            nonce: session.envelope_nonce(),
        }
    }

    /// Seal `plaintext`; the result is tag || ciphertext
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.cipher
            .encrypt(GenericArray::from_slice(&self.nonce), plaintext)
            .map_err(|e| CryptoError::EncryptionFailed {
                operation: "envelope".to_string(),
                reason: e.to_string(),
            })
    }

    /// Open an envelope
    ///
    /// # Errors
    ///
    /// [`CryptoError::DecryptionFailed`] if the tag does not verify. Callers
    /// must treat this as a broken session, not a transient failure.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.cipher
            .decrypt(GenericArray::from_slice(&self.nonce), ciphertext)
            .map_err(|e| CryptoError::DecryptionFailed {
                operation: "envelope".to_string(),
                reason: format!("authentication error: {}", e),
            })
    }

    /// Seal and base64-encode, the form envelopes take on the wire
    pub fn seal_base64(&self, plaintext: &[u8]) -> Result<String, CryptoError> {
        Ok(STANDARD.encode(self.encrypt(plaintext)?))
    }

    /// Base64-decode and open
    pub fn open_base64(&self, encoded: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let ciphertext = STANDARD.decode(encoded)?;
        self.decrypt(&ciphertext)
    }
}
