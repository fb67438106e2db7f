// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! In-process stand-in for the launcher gateway
//!
//! Speaks the same envelope as the real launcher: `/auth` seals a random
//! 64-byte key payload to the client, and the NFS routes open sealed bodies
//! and queries and seal their replies.

#![allow(dead_code)]

use axum::extract::{Path, RawQuery, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;
use safe_launcher_client::client::auth::{AuthRequestBody, AuthResponseBody};
use safe_launcher_client::crypto::seal_session_key;
use safe_launcher_client::nfs::{DirInfo, DirResponse, FileInfo, SafeTime};
use safe_launcher_client::{ClientConfig, EnvelopeCodec, GatewayClient, HandshakeKeys, Session};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use url::form_urlencoded;

/// A call the gateway accepted without acting on it
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    /// Raw path as sent, escapes intact
    pub path: String,
    /// Decrypted JSON body, `Null` when there was none
    pub body: Value,
}

#[derive(Default)]
pub struct GatewayState {
    sessions: Mutex<HashMap<String, Session>>,
    files: Mutex<HashMap<String, Vec<u8>>>,
    recorded: Mutex<Vec<RecordedCall>>,
    pub deny: AtomicBool,
    pub auth_calls: AtomicUsize,
}

impl GatewayState {
    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.recorded.lock().unwrap().clone()
    }

    pub fn revoke_all(&self) {
        self.sessions.lock().unwrap().clear();
    }

    fn session_for(&self, headers: &HeaderMap) -> Option<Session> {
        let token = headers
            .get(AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?;
        self.sessions.lock().unwrap().get(token).cloned()
    }
}

pub struct MockGateway {
    pub base_url: String,
    pub state: Arc<GatewayState>,
}

impl MockGateway {
    pub async fn start() -> Self {
        let state = Arc::new(GatewayState::default());
        let app = Router::new()
            .route("/auth", post(post_auth).get(get_auth))
            .route("/nfs/file", post(create_file))
            .route(
                "/nfs/file/:path/:shared",
                put(write_file).get(read_file).delete(delete_file),
            )
            .route(
                "/nfs/directory/:path/:shared",
                get(get_dir).put(record).delete(record),
            )
            .fallback(record)
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock gateway");
        let addr = listener.local_addr().expect("Failed to read local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock gateway failed");
        });

        Self {
            base_url: format!("http://{}/", addr),
            state,
        }
    }

    pub fn client(&self) -> GatewayClient {
        GatewayClient::new(ClientConfig::default().with_base_url(self.base_url.clone()))
            .expect("Failed to create client")
    }
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
}

fn sealed(session: &Session, status: StatusCode, body: &[u8]) -> Response {
    let envelope = EnvelopeCodec::new(session)
        .seal_base64(body)
        .expect("Failed to seal response");
    (status, envelope).into_response()
}

fn open_body(session: &Session, body: &str) -> Vec<u8> {
    EnvelopeCodec::new(session)
        .open_base64(body.as_bytes())
        .expect("Failed to open request body")
}

fn open_query(session: &Session, raw: Option<String>) -> HashMap<String, String> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return HashMap::new(),
    };
    let envelope = form_urlencoded::parse(raw.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
        .unwrap_or_default();
    let plain = EnvelopeCodec::new(session)
        .open_base64(envelope.as_bytes())
        .expect("Failed to open query");
    form_urlencoded::parse(&plain).into_owned().collect()
}

fn number(params: &HashMap<String, String>, key: &str) -> usize {
    params.get(key).and_then(|v| v.parse().ok()).unwrap_or(0)
}

async fn post_auth(
    State(state): State<Arc<GatewayState>>,
    Json(request): Json<AuthRequestBody>,
) -> Response {
    state.auth_calls.fetch_add(1, Ordering::SeqCst);
    if state.deny.load(Ordering::SeqCst) {
        return unauthorized();
    }

    let server = HandshakeKeys::generate().expect("Failed to generate server keys");
    let mut payload = [0u8; 64];
    rand::thread_rng().fill_bytes(&mut payload);
    let encrypted_key =
        seal_session_key(&payload, &request.public_key, server.secret_key(), &request.nonce)
            .expect("Failed to seal session key");

    let token = format!("token-{}", state.auth_calls.load(Ordering::SeqCst));
    let session = Session::from_opened_key(token.clone(), &payload).expect("Invalid payload");
    state.sessions.lock().unwrap().insert(token.clone(), session);

    Json(AuthResponseBody {
        token,
        encrypted_key,
        public_key: server.public_key().to_vec(),
    })
    .into_response()
}

async fn get_auth(State(state): State<Arc<GatewayState>>, headers: HeaderMap) -> Response {
    match state.session_for(&headers) {
        Some(_) => (StatusCode::OK, "OK").into_response(),
        None => unauthorized(),
    }
}

async fn create_file(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let Some(session) = state.session_for(&headers) else {
        return unauthorized();
    };
    let info: Value = serde_json::from_slice(&open_body(&session, &body)).expect("Bad JSON");
    let path = info["filePath"].as_str().unwrap_or_default().to_string();
    state.files.lock().unwrap().insert(path, Vec::new());
    (StatusCode::OK, "OK").into_response()
}

async fn write_file(
    State(state): State<Arc<GatewayState>>,
    Path((path, _shared)): Path<(String, bool)>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: String,
) -> Response {
    let Some(session) = state.session_for(&headers) else {
        return unauthorized();
    };
    let params = open_query(&session, query);
    let offset = number(&params, "offset");
    let contents = STANDARD
        .decode(open_body(&session, &body))
        .expect("Body is not base64");

    let mut files = state.files.lock().unwrap();
    let Some(file) = files.get_mut(&path) else {
        return sealed(&session, StatusCode::BAD_REQUEST, b"File not found");
    };
    if file.len() < offset + contents.len() {
        file.resize(offset + contents.len(), 0);
    }
    file[offset..offset + contents.len()].copy_from_slice(&contents);
    (StatusCode::OK, "OK").into_response()
}

async fn read_file(
    State(state): State<Arc<GatewayState>>,
    Path((path, _shared)): Path<(String, bool)>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let Some(session) = state.session_for(&headers) else {
        return unauthorized();
    };
    let params = open_query(&session, query);
    let Some(file) = state.file(&path) else {
        return sealed(&session, StatusCode::BAD_REQUEST, b"File not found");
    };

    let start = number(&params, "offset").min(file.len());
    let end = match number(&params, "length") {
        0 => file.len(),
        length => (start + length).min(file.len()),
    };
    let encoded = STANDARD.encode(&file[start..end]);
    sealed(&session, StatusCode::OK, encoded.as_bytes())
}

async fn delete_file(
    State(state): State<Arc<GatewayState>>,
    Path((path, _shared)): Path<(String, bool)>,
    headers: HeaderMap,
) -> Response {
    let Some(session) = state.session_for(&headers) else {
        return unauthorized();
    };
    match state.files.lock().unwrap().remove(&path) {
        Some(_) => (StatusCode::OK, "OK").into_response(),
        None => sealed(&session, StatusCode::BAD_REQUEST, b"File not found"),
    }
}

async fn get_dir(
    State(state): State<Arc<GatewayState>>,
    Path((path, _shared)): Path<(String, bool)>,
    headers: HeaderMap,
) -> Response {
    let Some(session) = state.session_for(&headers) else {
        return unauthorized();
    };
    let prefix = format!("{}/", path.trim_end_matches('/'));
    let files = state
        .files
        .lock()
        .unwrap()
        .iter()
        .filter_map(|(name, contents)| {
            let name = name.strip_prefix(&prefix)?;
            Some(FileInfo {
                name: name.to_string(),
                size: contents.len() as i64,
                created_on: SafeTime(1_466_000_000_000),
                modified_on: SafeTime(1_466_000_000_000),
                metadata: String::new(),
            })
        })
        .collect();

    let listing = DirResponse {
        info: DirInfo {
            name: path,
            ..Default::default()
        },
        files,
        sub_dirs: Vec::new(),
    };
    let json = serde_json::to_vec(&listing).expect("Failed to encode listing");
    sealed(&session, StatusCode::OK, &json)
}

/// Accept any other authenticated call and remember it
async fn record(
    State(state): State<Arc<GatewayState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let Some(session) = state.session_for(&headers) else {
        return unauthorized();
    };
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&open_body(&session, &body)).expect("Bad JSON")
    };
    state.recorded.lock().unwrap().push(RecordedCall {
        method: method.to_string(),
        path: uri.path().to_string(),
        body,
    });
    (StatusCode::OK, "OK").into_response()
}
