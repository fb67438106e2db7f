// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client for the SAFE launcher's local HTTP gateway
//!
//! The launcher authorizes an app once through an X25519 handshake and then
//! expects every request body and query string to be sealed under the
//! resulting session key. [`GatewayClient`] hides that envelope: callers
//! build a [`LogicalRequest`] and get back plaintext.

pub mod client;
pub mod config;
pub mod crypto;
pub mod nfs;
pub mod session;
pub mod version;

pub use client::{
    ApiError, AppInfo, ClientError, GatewayClient, HandshakeRequest, HttpResponse,
    LogicalRequest, SAFE_DRIVE_ACCESS,
};
pub use config::{ClientConfig, PersistedSession, DEFAULT_LAUNCHER_URL};
pub use crypto::{CryptoError, EnvelopeCodec, HandshakeKeys};
pub use nfs::{DirInfo, DirResponse, FileInfo, SafeTime};
pub use session::{Session, SessionStore};
