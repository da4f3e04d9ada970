//! 密钥确认
//!
//! 解封装失败被协议吸收后，双方只能靠密钥确认发现密钥不一致。
//! 标签为 `HMAC-SHA256(混合密钥, 标签前缀 ‖ 角色字节)`，角色字节区分方向，
//! 因此一方发出的标签不能被原样反射回去冒充另一方。

use super::session::Role;
use crate::combiner::HybridKey;
use crate::common::errors::{Error, Result};
use crate::common::utils::to_base64;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const CONFIRMATION_LABEL: &[u8] = b"seal-kem key confirmation";

pub const CONFIRMATION_TAG_LEN: usize = 32;

/// 一方发送给另一方的密钥确认标签，本身不是秘密
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationTag([u8; CONFIRMATION_TAG_LEN]);

impl ConfirmationTag {
    pub fn as_bytes(&self) -> &[u8; CONFIRMATION_TAG_LEN] {
        &self.0
    }

    pub fn to_base64(&self) -> String {
        to_base64(&self.0)
    }
}

fn confirmation_mac(key: &HybridKey, role: Role) -> Result<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|e| Error::KeyDerivation(format!("初始化HMAC失败: {}", e)))?;
    mac.update(CONFIRMATION_LABEL);
    mac.update(&[role.as_byte()]);
    Ok(mac)
}

impl HybridKey {
    /// 以 `role` 的身份计算确认标签
    pub fn confirmation_tag(&self, role: Role) -> Result<ConfirmationTag> {
        let mac = confirmation_mac(self, role)?;
        let mut tag = [0u8; CONFIRMATION_TAG_LEN];
        tag.copy_from_slice(&mac.finalize().into_bytes());
        Ok(ConfirmationTag(tag))
    }

    /// 常量时间地校验对方（`peer_role`）发来的确认标签
    pub fn verify_confirmation(&self, peer_role: Role, tag: &[u8]) -> bool {
        match confirmation_mac(self, peer_role) {
            Ok(mac) => mac.verify_slice(tag).is_ok(),
            Err(_) => false,
        }
    }
}
