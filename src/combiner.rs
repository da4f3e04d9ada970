//! # 密钥合并器
//!
//! 将传统KEM与后量子KEM各自产生的32字节共享密钥合并为一个32字节的混合密钥。
//!
//! 合并规则：`HKDF-SHA256(salt = 无, ikm = 传统密钥 ‖ 后量子密钥, info = 上下文标签)`。
//! 采用“拼接后提取”而不是异或，只要任一输入仍是均匀随机的，输出就不可预测，
//! 控制其中一个输入的攻击者无法抵消另一个输入的贡献。

use crate::asymmetric::keys::{SHARED_SECRET_LEN, SharedSecret};
use crate::common::errors::{Error, Result};
use crate::common::utils::constant_time_eq;
use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// 混合密钥长度（字节）
pub const HYBRID_KEY_LEN: usize = 32;

/// 默认的域分离标签
pub const HYBRID_KDF_INFO: &[u8] = b"hybrid key derivation";

/// 协议最终输出的混合密钥
///
/// 比较操作是常量时间的；`Debug` 不输出内容；离开作用域时清零。
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct HybridKey([u8; HYBRID_KEY_LEN]);

impl HybridKey {
    pub fn as_bytes(&self) -> &[u8; HYBRID_KEY_LEN] {
        &self.0
    }
}

impl PartialEq for HybridKey {
    fn eq(&self, other: &Self) -> bool {
        constant_time_eq(&self.0, &other.0)
    }
}

impl Eq for HybridKey {}

impl std::fmt::Debug for HybridKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("HybridKey([REDACTED])")
    }
}

/// 以固定顺序（传统在前、后量子在后）合并两个共享密钥
///
/// 合并器是纯函数：相同的输入与标签总是得到相同的输出。双方必须使用同一个标签。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombiner {
    info: Vec<u8>,
}

impl Default for KeyCombiner {
    fn default() -> Self {
        Self {
            info: HYBRID_KDF_INFO.to_vec(),
        }
    }
}

impl KeyCombiner {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用双方预先约定的其他标签，空标签会被拒绝
    pub fn with_label(label: impl Into<Vec<u8>>) -> Result<Self> {
        let info = label.into();
        if info.is_empty() {
            return Err(Error::Configuration("KDF上下文标签不能为空".to_string()));
        }
        Ok(Self { info })
    }

    pub fn label(&self) -> &[u8] {
        &self.info
    }

    /// 合并两个原始字节形式的共享密钥
    ///
    /// 任一输入不是恰好32字节时返回 `InvalidInputLength`，
    /// 绝不会退化为对空输入做派生。
    pub fn derive(&self, classical: &[u8], post_quantum: &[u8]) -> Result<HybridKey> {
        for input in [classical, post_quantum] {
            if input.len() != SHARED_SECRET_LEN {
                return Err(Error::InvalidInputLength {
                    expected: SHARED_SECRET_LEN,
                    actual: input.len(),
                });
            }
        }

        let mut ikm = Zeroizing::new([0u8; 2 * SHARED_SECRET_LEN]);
        ikm[..SHARED_SECRET_LEN].copy_from_slice(classical);
        ikm[SHARED_SECRET_LEN..].copy_from_slice(post_quantum);

        let hkdf = Hkdf::<Sha256>::new(None, &ikm[..]);
        let mut okm = [0u8; HYBRID_KEY_LEN];
        hkdf.expand(&self.info, &mut okm)
            .map_err(|e| Error::KeyDerivation(format!("HKDF扩展失败: {}", e)))?;
        Ok(HybridKey(okm))
    }

    /// 合并两个类型化的共享密钥，协议层使用该入口
    pub fn combine(
        &self,
        classical: &SharedSecret,
        post_quantum: &SharedSecret,
    ) -> Result<HybridKey> {
        self.derive(classical.as_bytes(), post_quantum.as_bytes())
    }
}
