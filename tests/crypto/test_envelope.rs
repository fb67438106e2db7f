// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use rand::{Rng, RngCore};
use safe_launcher_client::{CryptoError, EnvelopeCodec, Session};

fn session(key: u8) -> Session {
    Session::new("token", &[key; 32], &[7u8; 32]).unwrap()
}

#[test]
fn test_fixed_nonce_is_deterministic() {
    let first = EnvelopeCodec::new(&session(1)).encrypt(b"same").unwrap();
    let second = EnvelopeCodec::new(&session(1)).encrypt(b"same").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_tag_precedes_ciphertext() {
    let sealed = EnvelopeCodec::new(&session(1)).encrypt(b"Hello, World!").unwrap();
    assert_eq!(sealed.len(), 16 + b"Hello, World!".len());
}

#[test]
fn test_other_session_cannot_open() {
    let sealed = EnvelopeCodec::new(&session(1)).seal_base64(b"secret").unwrap();
    let result = EnvelopeCodec::new(&session(2)).open_base64(sealed.as_bytes());
    assert!(matches!(result, Err(CryptoError::DecryptionFailed { .. })));
}

#[test]
fn test_base64_round_trip_across_codecs() {
    let sealed = EnvelopeCodec::new(&session(3)).seal_base64(b"{\"a\":1}").unwrap();
    let opened = EnvelopeCodec::new(&session(3))
        .open_base64(sealed.as_bytes())
        .unwrap();
    assert_eq!(opened, b"{\"a\":1}");
}

#[test]
fn test_random_messages_round_trip() {
    let mut rng = rand::thread_rng();
    for _ in 0..64 {
        let mut key = [0u8; 32];
        let mut nonce = [0u8; 32];
        rng.fill_bytes(&mut key);
        rng.fill_bytes(&mut nonce);
        let codec = EnvelopeCodec::new(&Session::new("token", &key, &nonce).unwrap());

        let mut message = vec![0u8; rng.gen_range(0..2048)];
        rng.fill_bytes(&mut message);

        let sealed = codec.encrypt(&message).unwrap();
        assert_eq!(sealed.len(), message.len() + 16);
        assert_eq!(codec.decrypt(&sealed).unwrap(), message);

        let encoded = codec.seal_base64(&message).unwrap();
        assert_eq!(codec.open_base64(encoded.as_bytes()).unwrap(), message);
    }
}
