// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Response classification
//!
//! The gateway encrypts response bodies, except for a handful of short status
//! words it sends in the clear. The classifier undoes the envelope (or
//! recognises that there is none) and then maps non-2xx statuses to
//! [`ApiError`], so error bodies are readable whenever possible.

use super::{ApiError, ClientError};
use crate::crypto::EnvelopeCodec;
use crate::session::Session;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use tracing::{debug, warn};

/// Plaintext bodies the gateway sends unencrypted, keyed by status code
///
/// A body that equals the entry for its status is passed through untouched.
/// A stored file whose envelope happened to equal one of these strings would
/// be misread; the gateway protocol gives no way to tell them apart.
pub const PLAINTEXT_SENTINELS: &[(u16, &str)] = &[
    (200, "OK"),
    (202, "Accepted"),
    (500, "Server Error"),
];

/// The sentinel body for `status`, if it has one
pub fn plaintext_sentinel(status: StatusCode) -> Option<&'static str> {
    PLAINTEXT_SENTINELS
        .iter()
        .find(|(code, _)| *code == status.as_u16())
        .map(|(_, body)| *body)
}

/// A gateway response with a fully read body
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Strategy that turns a raw response into the caller-visible result
pub trait ResponseClassifier: Send + Sync {
    /// `decrypt` is true when the request was sent with encryption enabled
    fn classify(
        &self,
        session: Option<&Session>,
        response: HttpResponse,
        decrypt: bool,
    ) -> Result<HttpResponse, ClientError>;
}

/// Classifier implementing the launcher's conventions
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResponseClassifier;

impl DefaultResponseClassifier {
    fn open_body(
        &self,
        session: Option<&Session>,
        status: StatusCode,
        body: Vec<u8>,
    ) -> Result<Vec<u8>, ClientError> {
        if body.is_empty() {
            return Ok(body);
        }
        if plaintext_sentinel(status).is_some_and(|sentinel| sentinel.as_bytes() == body) {
            return Ok(body);
        }

        // Line breaks inside the base64 text are ignored
        let compact: Vec<u8> = body
            .iter()
            .copied()
            .filter(|b| !matches!(b, b'\r' | b'\n'))
            .collect();
        let ciphertext = match STANDARD.decode(&compact) {
            Ok(ciphertext) => ciphertext,
            Err(e) => {
                warn!(
                    "Response body ({} bytes, status {}) is not base64, treating as plaintext: {}",
                    body.len(),
                    status.as_u16(),
                    e
                );
                return Ok(body);
            }
        };

        let session = session.ok_or(ClientError::NoSession)?;
        EnvelopeCodec::new(session)
            .decrypt(&ciphertext)
            .map_err(ClientError::Decrypt)
    }
}

impl ResponseClassifier for DefaultResponseClassifier {
    fn classify(
        &self,
        session: Option<&Session>,
        mut response: HttpResponse,
        decrypt: bool,
    ) -> Result<HttpResponse, ClientError> {
        if decrypt {
            let body = std::mem::take(&mut response.body);
            response.body = self.open_body(session, response.status, body)?;
        }
        debug!("RESP BODY: {}", String::from_utf8_lossy(&response.body));

        if !response.status.is_success() {
            return Err(ApiError::new(response.status, response.body).into());
        }
        Ok(response)
    }
}
