//!
//! 端到端集成测试
//!
//! 使用真实的 RSA-OAEP 与 Kyber 验证完整的混合密钥封装流程：
//! 双方一致、篡改被吸收、数据包在文本通道上传输以及密钥确认。
//!

mod common;

use common::{run_session, setup_protocol, test_config};
use seal_kem::{
    CiphertextBundle, CryptoConfig, Error, ErrorKind, InitiatorSession, PublicBundle,
    ResponderSession, Role, RsaKyberProtocol, SessionState,
};
use std::io::Write;

// === 一致性 ===

#[test]
fn test_parties_agree_for_every_kyber_level() {
    for level in [512, 768, 1024] {
        let protocol = RsaKyberProtocol::new(test_config(level)).unwrap();
        let (initiator_key, responder_key) = run_session(&protocol);
        assert_eq!(initiator_key, responder_key, "kyber level {level}");
        assert_eq!(initiator_key.as_bytes().len(), 32);
    }
}

#[test]
fn test_independent_sessions_yield_independent_keys() {
    let protocol = setup_protocol();
    let (first, _) = run_session(&protocol);
    let (second, _) = run_session(&protocol);
    assert_ne!(first, second);
}

// === 篡改 ===

#[test]
fn test_bit_flips_never_surface_an_error() {
    let protocol = setup_protocol();
    let (public, _) = protocol.init_responder().unwrap();
    let (ciphertexts, initiator_key) = protocol.initiator_encapsulate(&public).unwrap();

    let classical_len = ciphertexts.classical.len();
    let pq_len = ciphertexts.post_quantum.len();
    let positions = [
        (true, 0, 0),
        (true, classical_len / 2, 3),
        (true, classical_len - 1, 7),
        (false, 0, 0),
        (false, pq_len / 2, 5),
        (false, pq_len - 1, 7),
    ];

    for (classical, byte, bit) in positions {
        // 每次都需要新的私密状态，因为它会被消费
        let (public, secrets) = protocol.init_responder().unwrap();
        let (mut tampered, key) = protocol.initiator_encapsulate(&public).unwrap();
        let target = if classical {
            &mut tampered.classical
        } else {
            &mut tampered.post_quantum
        };
        target[byte] ^= 1 << bit;

        let responder_key = protocol
            .responder_decapsulate(secrets, &tampered)
            .expect("tampering must be absorbed");
        assert_ne!(key, responder_key, "classical={classical} byte={byte} bit={bit}");
        assert_ne!(initiator_key, responder_key);
    }
}

#[test]
fn test_truncated_ciphertexts_are_absorbed() {
    let protocol = setup_protocol();
    let (public, secrets) = protocol.init_responder().unwrap();
    let (mut ciphertexts, initiator_key) = protocol.initiator_encapsulate(&public).unwrap();
    ciphertexts.classical.truncate(10);
    ciphertexts.post_quantum.clear();

    let responder_key = protocol
        .responder_decapsulate(secrets, &ciphertexts)
        .unwrap();
    assert_ne!(initiator_key, responder_key);
}

#[test]
fn test_malformed_public_bundle_aborts_initiator() {
    let protocol = setup_protocol();
    let (public, _) = protocol.init_responder().unwrap();

    let bad_classical = PublicBundle {
        classical: vec![0u8; 16].into(),
        post_quantum: public.post_quantum.clone(),
    };
    let err = protocol.initiator_encapsulate(&bad_classical).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Encapsulation);

    let bad_pq = PublicBundle {
        classical: public.classical.clone(),
        post_quantum: vec![0u8; 16].into(),
    };
    let err = protocol.initiator_encapsulate(&bad_pq).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Encapsulation);
}

// === 传输 ===

#[test]
fn test_bundles_survive_text_transport() {
    let protocol = setup_protocol();
    let (public, secrets) = protocol.init_responder().unwrap();

    let public_wire = public.to_base64().unwrap();
    let received_public = PublicBundle::from_base64(&public_wire).unwrap();
    assert_eq!(received_public, public);

    let (ciphertexts, initiator_key) = protocol.initiator_encapsulate(&received_public).unwrap();
    let ciphertext_wire = ciphertexts.to_base64().unwrap();
    let received = CiphertextBundle::from_base64(&ciphertext_wire).unwrap();

    let responder_key = protocol.responder_decapsulate(secrets, &received).unwrap();
    assert_eq!(initiator_key, responder_key);
}

#[test]
fn test_bundles_survive_json_transport() {
    let protocol = setup_protocol();
    let (public, secrets) = protocol.init_responder().unwrap();
    let json = serde_json::to_string(&public).unwrap();
    let public: PublicBundle = serde_json::from_str(&json).unwrap();

    let (ciphertexts, initiator_key) = protocol.initiator_encapsulate(&public).unwrap();
    let json = serde_json::to_vec(&ciphertexts).unwrap();
    let ciphertexts: CiphertextBundle = serde_json::from_slice(&json).unwrap();

    let responder_key = protocol.responder_decapsulate(secrets, &ciphertexts).unwrap();
    assert_eq!(initiator_key, responder_key);
}

// === 密钥确认 ===

#[test]
fn test_key_confirmation_detects_tampering() {
    let protocol = setup_protocol();

    let (initiator_key, responder_key) = run_session(&protocol);
    let tag = initiator_key.confirmation_tag(Role::Initiator).unwrap();
    assert!(responder_key.verify_confirmation(Role::Initiator, tag.as_bytes()));

    let (public, secrets) = protocol.init_responder().unwrap();
    let (mut ciphertexts, initiator_key) = protocol.initiator_encapsulate(&public).unwrap();
    ciphertexts.post_quantum[0] ^= 0x01;
    let responder_key = protocol.responder_decapsulate(secrets, &ciphertexts).unwrap();

    let tag = initiator_key.confirmation_tag(Role::Initiator).unwrap();
    assert!(!responder_key.verify_confirmation(Role::Initiator, tag.as_bytes()));
}

// === 会话对象 ===

#[test]
fn test_session_objects_end_to_end() {
    let protocol = setup_protocol();
    let mut responder = ResponderSession::new(&protocol);
    let mut initiator = InitiatorSession::new(&protocol);

    let public = responder.generate_keys().unwrap();
    let ciphertexts = initiator.encapsulate(&public).unwrap();
    let responder_key = responder.derive_key(&ciphertexts).unwrap();
    let initiator_key = initiator.take_key().unwrap();

    assert_eq!(responder_key, initiator_key);
    assert_eq!(responder.state(), SessionState::KeyDerived);
    assert!(matches!(
        responder.derive_key(&ciphertexts),
        Err(Error::InvalidState(_))
    ));
}

// === 配置 ===

#[test]
fn test_protocol_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"rsa_key_bits": 2048, "kyber_parameter_k": 512}}"#).unwrap();

    let config = CryptoConfig::from_file(file.path()).unwrap();
    let protocol = RsaKyberProtocol::new(config).unwrap();
    let (initiator_key, responder_key) = run_session(&protocol);
    assert_eq!(initiator_key, responder_key);
}

#[test]
fn test_weak_config_is_rejected() {
    let result = RsaKyberProtocol::new(CryptoConfig {
        rsa_key_bits: 1024,
        kyber_parameter_k: 768,
    });
    assert!(matches!(result, Err(Error::Configuration(_))));

    let result = RsaKyberProtocol::new(test_config(640));
    assert!(matches!(result, Err(Error::Configuration(_))));
}

// === 并发 ===

#[test]
fn test_concurrent_sessions_share_one_protocol() {
    let protocol = setup_protocol();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..3)
            .map(|_| scope.spawn(|| run_session(&protocol)))
            .collect();
        for handle in handles {
            let (initiator_key, responder_key) = handle.join().unwrap();
            assert_eq!(initiator_key, responder_key);
        }
    });
}
