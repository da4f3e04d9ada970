//! # Post-Quantum Key Encapsulation Module
//!
//! This module contains the lattice-based KEM, Kyber.
//! It implements the `KeyEncapsulationMechanism` trait and serves as the
//! post-quantum half of the hybrid protocol.
//!
//! ---
//!
//! # 后量子密钥封装模块
//!
//! 本模块包含基于格的Kyber密钥封装机制，
//! 实现 `KeyEncapsulationMechanism` 特征，作为混合协议的后量子部分。

pub mod kyber;

// 重新导出Kyber KEM，使crate的其他部分不必与内部模块结构耦合。
pub use kyber::{KyberKem, KyberLevel};
