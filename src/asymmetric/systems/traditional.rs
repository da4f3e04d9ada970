//! # Traditional Key Encapsulation Module
//!
//! This module contains the classical (factoring-based) KEM, RSA-OAEP.
//! It implements the `KeyEncapsulationMechanism` trait and serves as the
//! classical half of the hybrid protocol.
//!
//! ---
//!
//! # 传统密钥封装模块
//!
//! 本模块包含基于大整数分解的传统KEM（RSA-OAEP），
//! 实现 `KeyEncapsulationMechanism` 特征，作为混合协议的传统部分。

pub mod rsa;

// 重新导出RSA-OAEP KEM，方便其他模块调用。
pub use self::rsa::RsaOaepKem;
