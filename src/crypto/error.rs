// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crypto Error Types
//!
//! Error types for the handshake box, the session envelope and key generation.
//!
//! ## Error Variants
//!
//! - **DecryptionFailed**: box/secretbox open failed (wrong key, corrupted ciphertext, tag mismatch)
//! - **EncryptionFailed**: the cipher refused to seal a payload
//! - **InvalidKey**: key has the wrong size
//! - **InvalidNonce**: nonce is shorter than the 24 bytes XSalsa20 needs
//! - **InvalidPayload**: a handshake or session field is missing or malformed
//! - **RandomSource**: the OS random source failed; there is no fallback
//!
//! ## Usage Example
//!
//! ```rust
//! use safe_launcher_client::crypto::CryptoError;
//!
//! fn open(ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
//!     Err(CryptoError::DecryptionFailed {
//!         operation: "envelope".to_string(),
//!         reason: "authentication tag mismatch".to_string(),
//!     })
//! }
//! ```

use std::fmt;

/// Error type for all cryptographic operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Authenticated decryption failed
    ///
    /// This error occurs when:
    /// - Authentication tag verification fails (ciphertext tampered or wrong key)
    /// - Ciphertext is shorter than the tag
    DecryptionFailed {
        /// Which operation was being performed
        operation: String,
        /// Specific failure reason
        reason: String,
    },

    /// Authenticated encryption failed
    EncryptionFailed {
        /// Which operation was being performed
        operation: String,
        /// Specific failure reason
        reason: String,
    },

    /// Invalid cryptographic key
    InvalidKey {
        /// Type of key that failed (e.g., "server_public_key", "shared_key")
        key_type: String,
        /// Specific failure reason
        reason: String,
    },

    /// Invalid nonce size
    ///
    /// XSalsa20-Poly1305 requires 24-byte nonces.
    InvalidNonce {
        /// Expected nonce size (always 24 for XSalsa20)
        expected_size: usize,
        /// Actual nonce size provided
        actual_size: usize,
    },

    /// Handshake or session payload validation failed
    InvalidPayload {
        /// Which field failed validation
        field: String,
        /// Specific failure reason
        reason: String,
    },

    /// The secure random source returned an error
    RandomSource(String),
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::DecryptionFailed { operation, reason } => {
                write!(f, "Decryption failed during {}: {}", operation, reason)
            }
            CryptoError::EncryptionFailed { operation, reason } => {
                write!(f, "Encryption failed during {}: {}", operation, reason)
            }
            CryptoError::InvalidKey { key_type, reason } => {
                write!(f, "Invalid key ({}): {}", key_type, reason)
            }
            CryptoError::InvalidNonce {
                expected_size,
                actual_size,
            } => {
                write!(
                    f,
                    "Invalid nonce size: expected {} bytes, got {} bytes",
                    expected_size, actual_size
                )
            }
            CryptoError::InvalidPayload { field, reason } => {
                write!(f, "Invalid payload field '{}': {}", field, reason)
            }
            CryptoError::RandomSource(msg) => {
                write!(f, "Random source failure: {}", msg)
            }
        }
    }
}

impl std::error::Error for CryptoError {}

// Conversion from RustCrypto AEAD errors (box and secretbox share the aead crate)
impl From<crypto_box::aead::Error> for CryptoError {
    fn from(err: crypto_box::aead::Error) -> Self {
        CryptoError::DecryptionFailed {
            operation: "AEAD".to_string(),
            reason: format!("xsalsa20poly1305 error: {}", err),
        }
    }
}

impl From<rand::Error> for CryptoError {
    fn from(err: rand::Error) -> Self {
        CryptoError::RandomSource(err.to_string())
    }
}

impl From<base64::DecodeError> for CryptoError {
    fn from(err: base64::DecodeError) -> Self {
        CryptoError::InvalidPayload {
            field: "base64_field".to_string(),
            reason: format!("base64 decode error: {}", err),
        }
    }
}
