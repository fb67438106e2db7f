// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Launcher gateway client
//!
//! [`GatewayClient::execute`] runs one logical call: build the request
//! (encrypting body and query under the session), send it through the
//! transport, then classify the response (sentinels, envelope decryption,
//! non-2xx mapping). Each step is a swappable strategy:
//!
//! - [`RequestBuilder`] (default [`DefaultRequestBuilder`])
//! - [`HttpTransport`] (default [`ReqwestTransport`])
//! - [`ResponseClassifier`] (default [`DefaultResponseClassifier`])
//!
//! The client never retries. Data calls only read the session and may run
//! concurrently; re-authentication goes through
//! [`GatewayClient::ensure_authenticated`], which is serialized internally.

pub mod auth;
pub mod errors;
pub mod request;
pub mod response;
pub mod transport;

pub use auth::{AppInfo, HandshakeRequest, SAFE_DRIVE_ACCESS};
pub use errors::{ApiError, ClientError};
pub use request::{DefaultRequestBuilder, HttpRequest, LogicalRequest, RequestBuilder};
pub use response::{
    plaintext_sentinel, DefaultResponseClassifier, HttpResponse, ResponseClassifier,
    PLAINTEXT_SENTINELS,
};
pub use transport::{HttpTransport, ReqwestTransport};

use crate::config::{ClientConfig, PersistedSession};
use crate::session::SessionStore;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::Mutex;
use url::Url;

/// Client for the launcher's HTTP API
pub struct GatewayClient {
    base_url: Url,
    session: SessionStore,
    transport: Arc<dyn HttpTransport>,
    request_builder: Arc<dyn RequestBuilder>,
    response_classifier: Arc<dyn ResponseClassifier>,
    auth_lock: Mutex<()>,
}

impl GatewayClient {
    /// Create an unauthenticated client using the `reqwest` transport
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate().map_err(ClientError::Config)?;
        let transport = ReqwestTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client over a caller-provided transport
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ClientError> {
        let base_url = config.parsed_base_url().map_err(ClientError::Config)?;
        Ok(Self {
            base_url,
            session: SessionStore::new(),
            transport,
            request_builder: Arc::new(DefaultRequestBuilder),
            response_classifier: Arc::new(DefaultResponseClassifier),
            auth_lock: Mutex::new(()),
        })
    }

    /// Create a client from persisted state
    ///
    /// A non-empty `launcherServer` in the persisted state overrides the
    /// configured base URL.
    pub fn from_persisted(
        mut config: ClientConfig,
        persisted: &PersistedSession,
    ) -> Result<Self, ClientError> {
        if !persisted.base_url.is_empty() {
            config.base_url = persisted.base_url.clone();
        }
        let session = persisted
            .session()
            .map_err(|e| ClientError::Config(format!("Invalid persisted session: {}", e)))?;

        let client = Self::new(config)?;
        Ok(match session {
            Some(session) => client.with_session_store(SessionStore::with_session(session)),
            None => client,
        })
    }

    pub fn with_request_builder(mut self, builder: Arc<dyn RequestBuilder>) -> Self {
        self.request_builder = builder;
        self
    }

    pub fn with_response_classifier(mut self, classifier: Arc<dyn ResponseClassifier>) -> Self {
        self.response_classifier = classifier;
        self
    }

    pub fn with_session_store(mut self, store: SessionStore) -> Self {
        self.session = store;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session_store(&self) -> &SessionStore {
        &self.session
    }

    /// Current state in its persistable form
    pub async fn persisted(&self) -> PersistedSession {
        let session = self.session.current().await;
        PersistedSession::from_session(self.base_url.as_str(), session.as_deref())
    }

    /// Run one call and return the classified response
    ///
    /// # Errors
    ///
    /// Transport and integrity failures are returned as they happen; any
    /// status outside 200-299 becomes [`ClientError::Api`].
    pub async fn execute(&self, request: LogicalRequest) -> Result<HttpResponse, ClientError> {
        // Same snapshot for encrypting the request and opening the response
        let session = self.session.current().await;
        let http_request =
            self.request_builder
                .build(&self.base_url, session.as_deref(), &request)?;

        let response = self.transport.send(http_request).await?;
        self.response_classifier
            .classify(session.as_deref(), response, !request.skip_encryption)
    }

    /// Run one call and decode its JSON body
    ///
    /// An empty body yields `Ok(None)`.
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        request: LogicalRequest,
    ) -> Result<Option<T>, ClientError> {
        let response = self.execute(request).await?;
        if response.body.is_empty() {
            return Ok(None);
        }
        serde_json::from_slice(&response.body)
            .map(Some)
            .map_err(ClientError::ResponseDecode)
    }
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}
