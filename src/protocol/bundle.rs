//! 双方交换的两个数据包及其编码
//!
//! 二进制格式：`版本(1字节) ‖ u32_be(传统长度) ‖ 传统部分 ‖ u32_be(后量子长度) ‖ 后量子部分`。
//! 数据包中没有方案标识，字段顺序就是密文与方案之间唯一的绑定，任何时候都不得调换。

use crate::asymmetric::keys::PublicComponent;
use crate::common::errors::{Error, Result};
use crate::common::utils::{from_base64, to_base64};
use serde::{Deserialize, Serialize};

/// 当前的数据包格式版本
pub const BUNDLE_VERSION: u8 = 0x01;

const LEN_PREFIX: usize = 4;

fn encode_pair(classical: &[u8], post_quantum: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(1 + 2 * LEN_PREFIX + classical.len() + post_quantum.len());
    out.push(BUNDLE_VERSION);
    for (part, what) in [(classical, "传统组件"), (post_quantum, "后量子组件")] {
        if part.is_empty() {
            return Err(Error::Format(format!("{}为空", what)));
        }
        let len = u32::try_from(part.len())
            .map_err(|_| Error::Format(format!("组件过长: {} 字节", part.len())))?;
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(part);
    }
    Ok(out)
}

fn take_part<'a>(input: &mut &'a [u8], what: &str) -> Result<&'a [u8]> {
    if input.len() < LEN_PREFIX {
        return Err(Error::Format(format!("{}长度前缀被截断", what)));
    }
    let (prefix, rest) = input.split_at(LEN_PREFIX);
    let mut len_bytes = [0u8; LEN_PREFIX];
    len_bytes.copy_from_slice(prefix);
    let len = u32::from_be_bytes(len_bytes) as usize;
    if len == 0 {
        return Err(Error::Format(format!("{}为空", what)));
    }
    if rest.len() < len {
        return Err(Error::Format(format!(
            "{}被截断: 需要 {} 字节, 剩余 {}",
            what,
            len,
            rest.len()
        )));
    }
    let (part, rest) = rest.split_at(len);
    *input = rest;
    Ok(part)
}

fn decode_pair(bytes: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    let (&version, mut rest) = bytes
        .split_first()
        .ok_or_else(|| Error::Format("数据包为空".to_string()))?;
    if version != BUNDLE_VERSION {
        return Err(Error::Format(format!("不支持的数据包版本: {}", version)));
    }
    let classical = take_part(&mut rest, "传统组件")?;
    let post_quantum = take_part(&mut rest, "后量子组件")?;
    if !rest.is_empty() {
        return Err(Error::Format(format!("数据包末尾有 {} 字节多余数据", rest.len())));
    }
    Ok((classical.to_vec(), post_quantum.to_vec()))
}

/// 响应方发送给发起方的两个公钥组件（传统在前，后量子在后）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicBundle {
    pub classical: PublicComponent,
    pub post_quantum: PublicComponent,
}

impl PublicBundle {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        encode_pair(self.classical.as_bytes(), self.post_quantum.as_bytes())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (classical, post_quantum) = decode_pair(bytes)?;
        Ok(Self {
            classical: PublicComponent(classical),
            post_quantum: PublicComponent(post_quantum),
        })
    }

    pub fn to_base64(&self) -> Result<String> {
        Ok(to_base64(&self.to_bytes()?))
    }

    pub fn from_base64(encoded: &str) -> Result<Self> {
        Self::from_bytes(&from_base64(encoded)?)
    }
}

/// 发起方发送给响应方的两个密文（传统在前，后量子在后）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiphertextBundle {
    #[serde(with = "serde_bytes")]
    pub classical: Vec<u8>,
    #[serde(with = "serde_bytes")]
    pub post_quantum: Vec<u8>,
}

impl CiphertextBundle {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        encode_pair(&self.classical, &self.post_quantum)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (classical, post_quantum) = decode_pair(bytes)?;
        Ok(Self {
            classical,
            post_quantum,
        })
    }

    pub fn to_base64(&self) -> Result<String> {
        Ok(to_base64(&self.to_bytes()?))
    }

    pub fn from_base64(encoded: &str) -> Result<Self> {
        Self::from_bytes(&from_base64(encoded)?)
    }
}
