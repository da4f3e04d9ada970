//! # 混合密钥封装协议
//!
//! 编排两个相互独立的KEM（传统 + 后量子）与密钥合并器，在响应方与发起方之间
//! 建立同一个32字节的混合密钥。
//!
//! 流程：
//! 1. 响应方 `init_responder` 生成两对密钥，把 `PublicBundle` 交给发起方；
//! 2. 发起方 `initiator_encapsulate` 依次封装，合并得到密钥，把 `CiphertextBundle` 交回；
//! 3. 响应方 `responder_decapsulate` 按同样顺序解封装并合并，得到相同的密钥。
//!
//! 密钥生成或封装失败会中止整个会话，不存在只用单个KEM的降级模式。
//! 解封装失败在内部被吸收：替换为由会话拒绝种子派生的伪随机密钥，
//! 合并步骤照常执行，调用方只能通过后续的密钥确认发现不一致。

pub mod bundle;
pub mod confirmation;
pub mod session;

pub use self::bundle::{BUNDLE_VERSION, CiphertextBundle, PublicBundle};
pub use self::confirmation::ConfirmationTag;
pub use self::session::{
    InitiatorSession, ResponderSecrets, ResponderSession, Role, SessionState,
};

use crate::asymmetric::keys::{PrivateComponent, SHARED_SECRET_LEN, SharedSecret};
use crate::asymmetric::traits::KeyEncapsulationMechanism;
use crate::combiner::{HybridKey, KeyCombiner};
use crate::common::config::CryptoConfig;
use crate::common::errors::Result;
use log::debug;
use std::marker::PhantomData;
use subtle::Choice;

/// 由传统KEM `C` 与后量子KEM `P` 组成的混合协议
///
/// 实例本身不持有任何密钥材料，可以在多个线程间共享以并发运行互不相关的会话。
pub struct HybridProtocol<C, P> {
    config: CryptoConfig,
    combiner: KeyCombiner,
    _schemes: PhantomData<fn() -> (C, P)>,
}

impl<C, P> std::fmt::Debug for HybridProtocol<C, P>
where
    C: KeyEncapsulationMechanism,
    P: KeyEncapsulationMechanism,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridProtocol")
            .field("classical", &C::NAME)
            .field("post_quantum", &P::NAME)
            .field("config", &self.config)
            .finish()
    }
}

impl<C, P> HybridProtocol<C, P>
where
    C: KeyEncapsulationMechanism,
    P: KeyEncapsulationMechanism,
{
    /// 使用默认合并器构造协议，配置不合法时立即失败
    pub fn new(config: CryptoConfig) -> Result<Self> {
        Self::with_combiner(config, KeyCombiner::default())
    }

    pub fn with_combiner(config: CryptoConfig, combiner: KeyCombiner) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            combiner,
            _schemes: PhantomData,
        })
    }

    pub fn config(&self) -> &CryptoConfig {
        &self.config
    }

    pub fn combiner(&self) -> &KeyCombiner {
        &self.combiner
    }

    /// 响应方：生成两对密钥，返回待发送的公钥包与自己保留的私密状态
    pub fn init_responder(&self) -> Result<(PublicBundle, ResponderSecrets)> {
        let classical = C::generate_keypair(&self.config)?;
        let post_quantum = P::generate_keypair(&self.config)?;

        let public = PublicBundle {
            classical: classical.public,
            post_quantum: post_quantum.public,
        };
        let secrets = ResponderSecrets::new(classical.private, post_quantum.private)?;

        debug!(
            "responder keys generated: {} public {} bytes, {} public {} bytes",
            C::NAME,
            public.classical.len(),
            P::NAME,
            public.post_quantum.len()
        );
        Ok((public, secrets))
    }

    /// 发起方：针对两个公钥依次封装，返回密文包与合并后的混合密钥
    ///
    /// 任一封装失败都会使整个操作失败。两个中间共享密钥在返回前即被清零。
    pub fn initiator_encapsulate(
        &self,
        public: &PublicBundle,
    ) -> Result<(CiphertextBundle, HybridKey)> {
        let classical = C::encapsulate(&self.config, &public.classical)?;
        let post_quantum = P::encapsulate(&self.config, &public.post_quantum)?;

        let key = self
            .combiner
            .combine(&classical.shared_secret, &post_quantum.shared_secret)?;
        let ciphertexts = CiphertextBundle {
            classical: classical.ciphertext,
            post_quantum: post_quantum.ciphertext,
        };

        debug!(
            "initiator encapsulated: {} ciphertext {} bytes, {} ciphertext {} bytes",
            C::NAME,
            ciphertexts.classical.len(),
            P::NAME,
            ciphertexts.post_quantum.len()
        );
        Ok((ciphertexts, key))
    }

    /// 响应方：按固定顺序解封装两个密文并合并
    ///
    /// 解封装错误不会传出；只有合并器本身的失败会返回错误。
    /// `secrets` 按值传入，返回时所有私钥材料都已清零。
    pub fn responder_decapsulate(
        &self,
        secrets: ResponderSecrets,
        ciphertexts: &CiphertextBundle,
    ) -> Result<HybridKey> {
        let classical = self.decapsulate_or_reject::<C>(
            &secrets,
            &secrets.classical,
            &ciphertexts.classical,
        )?;
        let post_quantum = self.decapsulate_or_reject::<P>(
            &secrets,
            &secrets.post_quantum,
            &ciphertexts.post_quantum,
        )?;

        let key = self.combiner.combine(&classical, &post_quantum)?;
        debug!("responder derived hybrid key ({} + {})", C::NAME, P::NAME);
        Ok(key)
    }

    fn decapsulate_or_reject<K: KeyEncapsulationMechanism>(
        &self,
        secrets: &ResponderSecrets,
        private_key: &PrivateComponent,
        ciphertext: &[u8],
    ) -> Result<SharedSecret> {
        // 拒绝密钥每次都计算，结果以常量时间选择，成功与失败路径做同样的工作
        let rejected = secrets.rejection_secret(K::NAME, ciphertext)?;
        let decapsulated = K::decapsulate(&self.config, private_key, ciphertext);
        let accepted = Choice::from(u8::from(decapsulated.is_ok()));
        let candidate =
            decapsulated.unwrap_or_else(|_| SharedSecret::new([0u8; SHARED_SECRET_LEN]));
        Ok(SharedSecret::select(&candidate, &rejected, accepted))
    }
}
