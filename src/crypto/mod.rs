// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Gateway Transport Cryptography
//!
//! Primitives behind the launcher's authenticated transport:
//!
//! - **Keypair**: ephemeral X25519 key pair and nonce for the handshake
//! - **Session Box**: NaCl `box` that carries the session key from the gateway
//! - **Envelope**: NaCl `secretbox` used for every encrypted call in a session
//!
//! ## Security Considerations
//!
//! - A fresh key pair and nonce are generated for every handshake attempt
//! - The envelope reuses the session nonce for all messages; this is a
//!   property of the gateway protocol, see [`envelope`]
//! - Any tag mismatch is fatal for the session and is never retried
//!
//! ## Protocol Flow
//!
//! 1. Client generates an ephemeral key pair and a 24-byte nonce
//! 2. Client posts its public key and nonce to `/auth`
//! 3. Gateway replies with its public key and a boxed 64-byte payload
//! 4. Client opens the box with its private key and the request nonce
//! 5. Payload bytes 0..32 are the shared key, the rest is the session nonce
//! 6. All later payloads and query strings are sealed with that key and nonce

pub mod b64;
pub mod envelope;
pub mod error;
pub mod keypair;
pub mod session_box;

pub use envelope::EnvelopeCodec;
pub use error::CryptoError;
pub use keypair::HandshakeKeys;
pub use session_box::{open_session_key, seal_session_key};
