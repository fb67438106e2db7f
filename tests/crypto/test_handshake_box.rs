// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use safe_launcher_client::crypto::{open_session_key, seal_session_key, CryptoError};
use safe_launcher_client::{HandshakeKeys, Session};

fn gateway_payload() -> Vec<u8> {
    (0u8..64).collect()
}

#[test]
fn test_gateway_sealed_key_opens_into_session() {
    let client = HandshakeKeys::generate().unwrap();
    let gateway = HandshakeKeys::generate().unwrap();

    let sealed = seal_session_key(
        &gateway_payload(),
        client.public_key(),
        gateway.secret_key(),
        client.nonce(),
    )
    .unwrap();
    // box adds a 16-byte Poly1305 tag
    assert_eq!(sealed.len(), 64 + 16);

    let opened = open_session_key(&sealed, gateway.public_key(), &client).unwrap();
    let session = Session::from_opened_key("token", &opened).unwrap();

    assert_eq!(&session.shared_key()[..], &gateway_payload()[..32]);
    assert_eq!(session.nonce(), &gateway_payload()[32..]);
    assert_eq!(&session.envelope_nonce()[..], &gateway_payload()[32..56]);
}

#[test]
fn test_key_sealed_for_someone_else_is_rejected() {
    let client = HandshakeKeys::generate().unwrap();
    let other = HandshakeKeys::generate().unwrap();
    let gateway = HandshakeKeys::generate().unwrap();

    let sealed = seal_session_key(
        &gateway_payload(),
        other.public_key(),
        gateway.secret_key(),
        client.nonce(),
    )
    .unwrap();

    let result = open_session_key(&sealed, gateway.public_key(), &client);
    assert!(matches!(result, Err(CryptoError::DecryptionFailed { .. })));
}

#[test]
fn test_short_payload_cannot_become_session() {
    let result = Session::from_opened_key("token", &[0u8; 40]);
    assert!(matches!(result, Err(CryptoError::InvalidPayload { .. })));
}

#[test]
fn test_fresh_keys_each_handshake() {
    let a = HandshakeKeys::generate().unwrap();
    let b = HandshakeKeys::generate().unwrap();
    assert_ne!(a.public_key(), b.public_key());
    assert_ne!(a.nonce(), b.nonce());
}
