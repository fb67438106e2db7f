// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request construction
//!
//! A [`LogicalRequest`] describes one gateway call in domain terms. A
//! [`RequestBuilder`] turns it into the concrete [`HttpRequest`] that goes on
//! the wire: URL joining, body serialization, envelope encryption of body and
//! query string, and the bearer header.

use super::ClientError;
use crate::crypto::EnvelopeCodec;
use crate::session::Session;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;
use url::{form_urlencoded, Url};

/// One call to the gateway, before encryption
#[derive(Debug, Clone)]
pub struct LogicalRequest {
    /// Path below the base URL. Segments that need escaping must already be
    /// escaped; the path is used verbatim on the wire.
    pub path: String,
    pub method: Method,
    /// Serialized JSON body; takes precedence over `raw_body`
    pub json_body: Option<Vec<u8>>,
    /// Raw body; an empty vector is still a (zero-length) body
    pub raw_body: Option<Vec<u8>>,
    /// Query parameters, encoded with sorted keys
    pub query: BTreeMap<String, Vec<String>>,
    /// Send body and query as-is and do not decrypt the response
    pub skip_encryption: bool,
    /// Do not attach the bearer token
    pub skip_auth: bool,
}

impl LogicalRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            json_body: None,
            raw_body: None,
            query: BTreeMap::new(),
            skip_encryption: false,
            skip_auth: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Set a JSON body
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        let bytes = serde_json::to_vec(body).map_err(|e| {
            ClientError::InvalidRequest(format!("Unable to JSON marshal body: {}", e))
        })?;
        self.json_body = Some(bytes);
        Ok(self)
    }

    pub fn raw(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.raw_body = Some(body.into());
        self
    }

    /// Append a query value
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.entry(key.into()).or_default().push(value.into());
        self
    }

    pub fn skip_encryption(mut self) -> Self {
        self.skip_encryption = true;
        self
    }

    pub fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }

    /// Form-encoded query string (`a=1&b=2`), empty when there are no params
    pub fn encoded_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.query {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }

    /// Body bytes to send and whether they are JSON
    pub fn body(&self) -> Option<(&[u8], bool)> {
        match (&self.json_body, &self.raw_body) {
            (Some(json), _) => Some((json.as_slice(), true)),
            (None, Some(raw)) => Some((raw.as_slice(), false)),
            (None, None) => None,
        }
    }
}

/// A fully built HTTP request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// Strategy that turns a [`LogicalRequest`] into an [`HttpRequest`]
pub trait RequestBuilder: Send + Sync {
    fn build(
        &self,
        base_url: &Url,
        session: Option<&Session>,
        request: &LogicalRequest,
    ) -> Result<HttpRequest, ClientError>;
}

/// Builder implementing the launcher's wire conventions
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRequestBuilder;

impl RequestBuilder for DefaultRequestBuilder {
    fn build(
        &self,
        base_url: &Url,
        session: Option<&Session>,
        request: &LogicalRequest,
    ) -> Result<HttpRequest, ClientError> {
        let mut url = join_path(base_url, &request.path)?;
        let query = request.encoded_query();
        debug!("Calling {} {}", request.method, url);

        let codec = if request.skip_encryption {
            None
        } else {
            session.map(EnvelopeCodec::new)
        };
        let needs_codec = !request.skip_encryption && (request.body().is_some() || !query.is_empty());
        if needs_codec && codec.is_none() {
            return Err(ClientError::NoSession);
        }

        let mut headers = HeaderMap::new();
        let mut body = None;
        if let Some((bytes, is_json)) = request.body() {
            debug!("REQ BODY: {}", String::from_utf8_lossy(bytes));
            match &codec {
                Some(codec) => {
                    body = Some(seal(codec, bytes, "body")?.into_bytes());
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
                }
                None => {
                    body = Some(bytes.to_vec());
                    let content_type = if is_json { "application/json" } else { "text/plain" };
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
                }
            }
        }

        if let Some(session) = session {
            if !request.skip_auth {
                let bearer = HeaderValue::from_str(&format!("Bearer {}", session.token()))
                    .map_err(|e| ClientError::InvalidRequest(format!("Invalid token: {}", e)))?;
                headers.insert(AUTHORIZATION, bearer);
            }
        }

        if !query.is_empty() {
            match &codec {
                Some(codec) => {
                    let sealed = seal(codec, query.as_bytes(), "query")?;
                    let escaped: String = form_urlencoded::byte_serialize(sealed.as_bytes()).collect();
                    url.set_query(Some(&escaped));
                }
                None => url.set_query(Some(&query)),
            }
        }

        Ok(HttpRequest {
            method: request.method.clone(),
            url,
            headers,
            body,
        })
    }
}

fn seal(codec: &EnvelopeCodec, bytes: &[u8], what: &str) -> Result<String, ClientError> {
    codec
        .seal_base64(bytes)
        .map_err(|e| ClientError::InvalidRequest(format!("Unable to encrypt {}: {}", what, e)))
}

/// Join `path` onto the base URL's path, keeping the caller's escaping
fn join_path(base_url: &Url, path: &str) -> Result<Url, ClientError> {
    unescape(path)?;
    let mut url = base_url.clone();
    let joined = format!(
        "{}/{}",
        base_url.path().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    url.set_path(&joined);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Form-style unescape (`+` is a space); rejects malformed `%` escapes
pub fn unescape(input: &str) -> Result<String, ClientError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = bytes
                    .get(i + 1..i + 3)
                    .and_then(|h| std::str::from_utf8(h).ok())
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
                    .ok_or_else(|| {
                        ClientError::InvalidRequest(format!(
                            "Unable to unescape given path: invalid escape at byte {} of {:?}",
                            i, input
                        ))
                    })?;
                out.push(hex);
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Escape a whole path into one URL segment (`/` becomes `%2F`)
///
/// Spaces are written as `%20`: a `+` inside a path is not decoded back to a
/// space by the gateway. A literal `+` is already escaped as `%2B`.
pub fn escape_segment(segment: &str) -> String {
    form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
