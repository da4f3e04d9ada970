//!
//! 集成测试的通用辅助函数
//!

#![allow(dead_code)]

use seal_kem::{CryptoConfig, HybridKey, RsaKyberProtocol};

/// 测试用配置：2048位RSA以缩短密钥生成时间，Kyber级别可选
pub fn test_config(kyber_parameter_k: usize) -> CryptoConfig {
    CryptoConfig {
        rsa_key_bits: 2048,
        kyber_parameter_k,
    }
}

pub fn setup_protocol() -> RsaKyberProtocol {
    RsaKyberProtocol::new(test_config(768)).unwrap()
}

/// 完整运行一次会话，返回 (发起方密钥, 响应方密钥)
pub fn run_session(protocol: &RsaKyberProtocol) -> (HybridKey, HybridKey) {
    let (public, secrets) = protocol.init_responder().unwrap();
    let (ciphertexts, initiator_key) = protocol.initiator_encapsulate(&public).unwrap();
    let responder_key = protocol
        .responder_decapsulate(secrets, &ciphertexts)
        .unwrap();
    (initiator_key, responder_key)
}
