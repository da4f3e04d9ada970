//! KEM 层共享的数据类型：公钥/私钥组件、密钥对、共享密钥与封装结果。
use crate::common::errors::{Error, Result};
use crate::common::utils::ZeroizingVec;
use serde::{Deserialize, Serialize};
use subtle::{Choice, ConditionallySelectable};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// 共享密钥长度（字节），两种KEM都必须输出该长度
pub const SHARED_SECRET_LEN: usize = 32;

/// 公钥组件，按值跨越信任边界传递
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicComponent(#[serde(with = "serde_bytes")] pub Vec<u8>);

impl PublicComponent {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for PublicComponent {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// 私钥组件，释放时自动清零，只属于生成它的一方
#[derive(Debug, Clone, PartialEq)]
pub struct PrivateComponent(pub ZeroizingVec);

impl PrivateComponent {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for PrivateComponent {
    fn from(bytes: Vec<u8>) -> Self {
        Self(ZeroizingVec(bytes))
    }
}

/// 单个KEM方案的密钥对
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub public: PublicComponent,
    pub private: PrivateComponent,
}

/// 固定32字节的共享密钥
///
/// 只能从恰好32字节的输入构造；离开作用域时清零。
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; SHARED_SECRET_LEN]);

impl SharedSecret {
    pub fn new(bytes: [u8; SHARED_SECRET_LEN]) -> Self {
        Self(bytes)
    }

    /// 从切片构造，长度不为32时返回 `InvalidInputLength`
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; SHARED_SECRET_LEN] =
            bytes.try_into().map_err(|_| Error::InvalidInputLength {
                expected: SHARED_SECRET_LEN,
                actual: bytes.len(),
            })?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; SHARED_SECRET_LEN] {
        &self.0
    }

    /// 常量时间选择：`choice` 为1时返回 `accepted` 的副本，否则返回 `rejected` 的副本
    pub(crate) fn select(accepted: &Self, rejected: &Self, choice: Choice) -> Self {
        let mut out = [0u8; SHARED_SECRET_LEN];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = u8::conditional_select(&rejected.0[i], &accepted.0[i], choice);
        }
        Self(out)
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SharedSecret([REDACTED])")
    }
}

/// 一次封装的输出：发送给对方的密文与本地保留的共享密钥
#[derive(Debug)]
pub struct EncapsulationResult {
    pub ciphertext: Vec<u8>,
    pub shared_secret: SharedSecret,
}
