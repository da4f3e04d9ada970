//! `RsaOaepKem` 提供基于 RSA-OAEP (SHA-256, MGF1-SHA256) 的密钥封装机制。
//! 在混合协议中，它是“传统”的一方：安全性依赖大整数分解的困难性。
//!
//! 解封装采用隐式拒绝：填充校验失败或明文长度不符时，返回由私钥与密文
//! 派生的伪随机密钥，而不是错误。真实结果与拒绝结果每次都会计算，
//! 最终通过常量时间选择输出。`rsa` crate 本身的 OAEP 解密路径不保证常量时间，
//! 这部分残余的时序风险无法在本层消除。

use crate::asymmetric::keys::{
    EncapsulationResult, KeyPair, PrivateComponent, PublicComponent, SHARED_SECRET_LEN,
    SharedSecret,
};
use crate::asymmetric::traits::KeyEncapsulationMechanism;
use crate::common::config::{CryptoConfig, MIN_RSA_KEY_BITS};
use crate::common::errors::{Error, Result};
use hmac::{Hmac, Mac};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::rand_core::{OsRng, RngCore};
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use subtle::{Choice, ConditionallySelectable};
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

const REJECTION_LABEL: &[u8] = b"seal-kem/rsa-oaep/implicit-rejection";

/// RSA-OAEP 密钥封装实现
pub struct RsaOaepKem;

impl RsaOaepKem {
    /// 拒绝密钥 = SHA-256(标签 ‖ 私钥DER)，输出 = HMAC(拒绝密钥, 密文)
    fn rejection_secret(
        private_der: &[u8],
        ciphertext: &[u8],
    ) -> Result<Zeroizing<[u8; SHARED_SECRET_LEN]>> {
        let mut rejection_key = Zeroizing::new([0u8; 32]);
        rejection_key.copy_from_slice(
            &Sha256::new()
                .chain_update(REJECTION_LABEL)
                .chain_update(private_der)
                .finalize(),
        );
        let mut mac = HmacSha256::new_from_slice(&rejection_key[..])
            .map_err(|e| Error::Decapsulation(format!("初始化HMAC失败: {}", e)))?;
        mac.update(ciphertext);

        let mut out = Zeroizing::new([0u8; SHARED_SECRET_LEN]);
        out.copy_from_slice(&mac.finalize().into_bytes());
        Ok(out)
    }
}

impl KeyEncapsulationMechanism for RsaOaepKem {
    const NAME: &'static str = "RSA-OAEP-SHA256";

    fn generate_keypair(config: &CryptoConfig) -> Result<KeyPair> {
        let bits = config.rsa_key_bits;
        if bits < MIN_RSA_KEY_BITS {
            return Err(Error::KeyGen(format!(
                "RSA密钥位数过小: {}, 最小为 {}",
                bits, MIN_RSA_KEY_BITS
            )));
        }

        let private_key = RsaPrivateKey::new(&mut OsRng, bits)
            .map_err(|e| Error::KeyGen(format!("生成RSA密钥失败: {}", e)))?;
        let public_key = RsaPublicKey::from(&private_key);

        // 公钥以SPKI DER、私钥以PKCS#8 DER形式保存
        let public_der = public_key
            .to_public_key_der()
            .map_err(|e| Error::KeyGen(format!("导出RSA公钥DER失败: {}", e)))?;
        let private_der = private_key
            .to_pkcs8_der()
            .map_err(|e| Error::KeyGen(format!("导出RSA私钥DER失败: {}", e)))?;

        Ok(KeyPair {
            public: PublicComponent(public_der.as_bytes().to_vec()),
            private: PrivateComponent::from(private_der.as_bytes().to_vec()),
        })
    }

    fn encapsulate(
        _config: &CryptoConfig,
        public_key: &PublicComponent,
    ) -> Result<EncapsulationResult> {
        let public_key = RsaPublicKey::from_public_key_der(public_key.as_bytes())
            .map_err(|e| Error::Encapsulation(format!("解析RSA公钥失败: {}", e)))?;
        if public_key.size() * 8 < MIN_RSA_KEY_BITS {
            return Err(Error::Encapsulation(format!(
                "RSA公钥强度不足: {} 位",
                public_key.size() * 8
            )));
        }

        let mut secret = Zeroizing::new([0u8; SHARED_SECRET_LEN]);
        OsRng
            .try_fill_bytes(&mut secret[..])
            .map_err(|e| Error::Encapsulation(format!("生成随机密钥失败: {}", e)))?;

        let ciphertext = public_key
            .encrypt(&mut OsRng, Oaep::new::<Sha256>(), &secret[..])
            .map_err(|e| Error::Encapsulation(format!("RSA-OAEP加密失败: {}", e)))?;

        Ok(EncapsulationResult {
            ciphertext,
            shared_secret: SharedSecret::new(*secret),
        })
    }

    fn decapsulate(
        _config: &CryptoConfig,
        private_key: &PrivateComponent,
        ciphertext: &[u8],
    ) -> Result<SharedSecret> {
        let private_der = private_key.as_bytes();
        let rsa_private_key = RsaPrivateKey::from_pkcs8_der(private_der)
            .map_err(|e| Error::Decapsulation(format!("解析RSA私钥失败: {}", e)))?;

        let rejected = Self::rejection_secret(private_der, ciphertext)?;
        let decrypted = rsa_private_key
            .decrypt(Oaep::new::<Sha256>(), ciphertext)
            .map(Zeroizing::new);

        let mut candidate = Zeroizing::new([0u8; SHARED_SECRET_LEN]);
        let accepted = match &decrypted {
            Ok(plaintext) if plaintext.len() == SHARED_SECRET_LEN => {
                candidate.copy_from_slice(plaintext);
                Choice::from(1)
            }
            _ => Choice::from(0),
        };

        let mut out = [0u8; SHARED_SECRET_LEN];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = u8::conditional_select(&rejected[i], &candidate[i], accepted);
        }
        Ok(SharedSecret::new(out))
    }
}
