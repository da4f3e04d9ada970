//! # Hybrid Key Encapsulation Module
//!
//! This module wires a traditional KEM (RSA-OAEP) and a post-quantum KEM (Kyber) into
//! the generic hybrid protocol. The session key stays secret as long as either
//! component scheme remains unbroken.
//!
//! ---
//!
//! # 混合密钥封装模块
//!
//! 本模块把传统KEM（RSA-OAEP）与后量子KEM（Kyber）接入通用的混合协议。
//! 只要其中任一方案未被攻破，会话密钥就仍然是安全的。

pub mod rsa_kyber;

// 重新导出RSA-Kyber混合协议，调用方无需引用具体的实现文件
pub use rsa_kyber::RsaKyberProtocol;
