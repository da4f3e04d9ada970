//!
//! # 通用配置模块
//!
//! 定义混合密钥封装协议使用的参数：RSA 模数位数与 Kyber 安全级别。
//! 参数在构造协议实例时校验一次，整个会话期间固定，不在协议中途协商。
//!
use crate::common::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 允许的最小RSA模数位数
pub const MIN_RSA_KEY_BITS: usize = 2048;

/// 支持的Kyber安全级别
pub const SUPPORTED_KYBER_LEVELS: [usize; 3] = [512, 768, 1024];

/// 密码学参数配置
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CryptoConfig {
    /// RSA密钥位数
    #[serde(default = "default_rsa_key_bits")]
    pub rsa_key_bits: usize,
    /// Kyber安全级别 (512/768/1024)
    #[serde(default = "default_kyber_parameter_k")]
    pub kyber_parameter_k: usize,
}

fn default_rsa_key_bits() -> usize {
    3072 // NIST建议的安全位数
}

fn default_kyber_parameter_k() -> usize {
    768 // NIST竞赛中的推荐级别
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            rsa_key_bits: default_rsa_key_bits(),
            kyber_parameter_k: default_kyber_parameter_k(),
        }
    }
}

impl CryptoConfig {
    /// 校验参数，任何不合规的取值都会在生成密钥之前被拒绝
    pub fn validate(&self) -> Result<()> {
        if self.rsa_key_bits < MIN_RSA_KEY_BITS {
            return Err(Error::Configuration(format!(
                "RSA密钥位数过小: {}, 最小为 {}",
                self.rsa_key_bits, MIN_RSA_KEY_BITS
            )));
        }
        if !SUPPORTED_KYBER_LEVELS.contains(&self.kyber_parameter_k) {
            return Err(Error::Configuration(format!(
                "不支持的Kyber安全级别: {}",
                self.kyber_parameter_k
            )));
        }
        Ok(())
    }

    /// 从JSON字符串加载并校验配置
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 从JSON文件加载并校验配置
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
