//! `KyberKem` 提供基于格的 Kyber 密钥封装机制，是混合协议中的后量子一方。
//!
//! 参数集（512/768/1024）由 `CryptoConfig::kyber_parameter_k` 决定，整个会话固定。
//! Kyber 的解封装本身是隐式拒绝的：被篡改的密文会得到一个与真实密钥无关的伪随机密钥。
//!
//! `pqcrypto-kyber` 的 `SecretKey` 与 `SharedSecret` 是 `Copy` 类型，既不实现 `Zeroize`
//! 也没有 `Drop`，本层无法擦除它们在栈上的副本。这里只保证：这些值在产生它的分支内
//! 立即复制进自动清零的 `PrivateComponent` / `SharedSecret`，不会被保存或传出。
//! 库内部的栈副本是已知的残余风险。

use crate::asymmetric::keys::{
    EncapsulationResult, KeyPair, PrivateComponent, PublicComponent, SharedSecret,
};
use crate::asymmetric::traits::KeyEncapsulationMechanism;
use crate::common::config::CryptoConfig;
use crate::common::errors::{Error, Result};
use crate::common::utils::ZeroizingVec;
use pqcrypto_kyber::{kyber512, kyber768, kyber1024};
use pqcrypto_traits::kem::{Ciphertext, PublicKey, SecretKey, SharedSecret as _};

/// Kyber 参数集
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KyberLevel {
    Kyber512,
    Kyber768,
    Kyber1024,
}

impl KyberLevel {
    pub fn from_config(config: &CryptoConfig) -> Result<Self> {
        match config.kyber_parameter_k {
            512 => Ok(KyberLevel::Kyber512),
            768 => Ok(KyberLevel::Kyber768),
            1024 => Ok(KyberLevel::Kyber1024),
            k => Err(Error::Configuration(format!("不支持的Kyber安全级别: {}", k))),
        }
    }

    pub fn public_key_bytes(self) -> usize {
        match self {
            KyberLevel::Kyber512 => kyber512::public_key_bytes(),
            KyberLevel::Kyber768 => kyber768::public_key_bytes(),
            KyberLevel::Kyber1024 => kyber1024::public_key_bytes(),
        }
    }

    pub fn secret_key_bytes(self) -> usize {
        match self {
            KyberLevel::Kyber512 => kyber512::secret_key_bytes(),
            KyberLevel::Kyber768 => kyber768::secret_key_bytes(),
            KyberLevel::Kyber1024 => kyber1024::secret_key_bytes(),
        }
    }

    pub fn ciphertext_bytes(self) -> usize {
        match self {
            KyberLevel::Kyber512 => kyber512::ciphertext_bytes(),
            KyberLevel::Kyber768 => kyber768::ciphertext_bytes(),
            KyberLevel::Kyber1024 => kyber1024::ciphertext_bytes(),
        }
    }
}

/// Kyber 密钥封装实现
pub struct KyberKem;

fn wrap_keypair(public_key: &[u8], private_key: &[u8]) -> KeyPair {
    KeyPair {
        public: PublicComponent(public_key.to_vec()),
        private: PrivateComponent(ZeroizingVec(private_key.to_vec())),
    }
}

impl KeyEncapsulationMechanism for KyberKem {
    const NAME: &'static str = "Kyber";

    fn generate_keypair(config: &CryptoConfig) -> Result<KeyPair> {
        let level = KyberLevel::from_config(config).map_err(|e| Error::KeyGen(e.to_string()))?;
        // 私钥字节在分支内直接进入自动清零的容器
        let keypair = match level {
            KyberLevel::Kyber512 => {
                let (pk, sk) = kyber512::keypair();
                wrap_keypair(pk.as_bytes(), sk.as_bytes())
            }
            KyberLevel::Kyber768 => {
                let (pk, sk) = kyber768::keypair();
                wrap_keypair(pk.as_bytes(), sk.as_bytes())
            }
            KyberLevel::Kyber1024 => {
                let (pk, sk) = kyber1024::keypair();
                wrap_keypair(pk.as_bytes(), sk.as_bytes())
            }
        };
        Ok(keypair)
    }

    fn encapsulate(
        config: &CryptoConfig,
        public_key: &PublicComponent,
    ) -> Result<EncapsulationResult> {
        let level =
            KyberLevel::from_config(config).map_err(|e| Error::Encapsulation(e.to_string()))?;
        let pk_bytes = public_key.as_bytes();
        if pk_bytes.len() != level.public_key_bytes() {
            return Err(Error::Encapsulation(format!(
                "无效的{:?}公钥长度: {}, 预期 {}",
                level,
                pk_bytes.len(),
                level.public_key_bytes()
            )));
        }

        let (shared_secret, ciphertext) = match level {
            KyberLevel::Kyber512 => {
                let pk = kyber512::PublicKey::from_bytes(pk_bytes)
                    .map_err(|_| Error::Encapsulation("无效的Kyber512公钥格式".to_string()))?;
                let (ss, ct) = kyber512::encapsulate(&pk);
                (SharedSecret::from_slice(ss.as_bytes()), ct.as_bytes().to_vec())
            }
            KyberLevel::Kyber768 => {
                let pk = kyber768::PublicKey::from_bytes(pk_bytes)
                    .map_err(|_| Error::Encapsulation("无效的Kyber768公钥格式".to_string()))?;
                let (ss, ct) = kyber768::encapsulate(&pk);
                (SharedSecret::from_slice(ss.as_bytes()), ct.as_bytes().to_vec())
            }
            KyberLevel::Kyber1024 => {
                let pk = kyber1024::PublicKey::from_bytes(pk_bytes)
                    .map_err(|_| Error::Encapsulation("无效的Kyber1024公钥格式".to_string()))?;
                let (ss, ct) = kyber1024::encapsulate(&pk);
                (SharedSecret::from_slice(ss.as_bytes()), ct.as_bytes().to_vec())
            }
        };

        Ok(EncapsulationResult {
            ciphertext,
            shared_secret: shared_secret?,
        })
    }

    fn decapsulate(
        config: &CryptoConfig,
        private_key: &PrivateComponent,
        ciphertext: &[u8],
    ) -> Result<SharedSecret> {
        let level =
            KyberLevel::from_config(config).map_err(|e| Error::Decapsulation(e.to_string()))?;
        let sk_bytes = private_key.as_bytes();
        if sk_bytes.len() != level.secret_key_bytes() {
            return Err(Error::Decapsulation("私钥与配置的Kyber级别不匹配".to_string()));
        }
        if ciphertext.len() != level.ciphertext_bytes() {
            return Err(Error::Decapsulation(format!(
                "{:?}密文长度无效: {}",
                level,
                ciphertext.len()
            )));
        }

        match level {
            KyberLevel::Kyber512 => {
                let ct = kyber512::Ciphertext::from_bytes(ciphertext)
                    .map_err(|_| Error::Decapsulation("无效的Kyber512密文格式".to_string()))?;
                let sk = kyber512::SecretKey::from_bytes(sk_bytes)
                    .map_err(|_| Error::Decapsulation("无效的Kyber512私钥格式".to_string()))?;
                SharedSecret::from_slice(kyber512::decapsulate(&ct, &sk).as_bytes())
            }
            KyberLevel::Kyber768 => {
                let ct = kyber768::Ciphertext::from_bytes(ciphertext)
                    .map_err(|_| Error::Decapsulation("无效的Kyber768密文格式".to_string()))?;
                let sk = kyber768::SecretKey::from_bytes(sk_bytes)
                    .map_err(|_| Error::Decapsulation("无效的Kyber768私钥格式".to_string()))?;
                SharedSecret::from_slice(kyber768::decapsulate(&ct, &sk).as_bytes())
            }
            KyberLevel::Kyber1024 => {
                let ct = kyber1024::Ciphertext::from_bytes(ciphertext)
                    .map_err(|_| Error::Decapsulation("无效的Kyber1024密文格式".to_string()))?;
                let sk = kyber1024::SecretKey::from_bytes(sk_bytes)
                    .map_err(|_| Error::Decapsulation("无效的Kyber1024私钥格式".to_string()))?;
                SharedSecret::from_slice(kyber1024::decapsulate(&ct, &sk).as_bytes())
            }
        }
    }
}
