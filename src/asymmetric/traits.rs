//! 定义了密钥封装机制的核心 Trait。
use crate::asymmetric::keys::{
    EncapsulationResult, KeyPair, PrivateComponent, PublicComponent, SharedSecret,
};
use crate::common::config::CryptoConfig;
use crate::common::errors::Result;

/// `KeyEncapsulationMechanism` 定义了混合协议中每个KEM方案必须提供的功能。
///
/// 传统方案与后量子方案实现同一个 Trait，协议层对二者一视同仁，
/// 测试中也可以注入模拟实现。参数集由 `CryptoConfig` 决定，
/// 同一会话内的三个操作必须使用同一份配置。
pub trait KeyEncapsulationMechanism {
    /// 方案名称，用于日志与隐式拒绝的域分离
    const NAME: &'static str;

    /// 生成新的密钥对，失败时返回 `Error::KeyGen`
    fn generate_keypair(config: &CryptoConfig) -> Result<KeyPair>;

    /// 针对对方公钥封装一个新的32字节共享密钥，失败时返回 `Error::Encapsulation`
    fn encapsulate(
        config: &CryptoConfig,
        public_key: &PublicComponent,
    ) -> Result<EncapsulationResult>;

    /// 用私钥恢复共享密钥
    ///
    /// 实现应尽量采用隐式拒绝：对被篡改的密文返回伪随机密钥而不是错误。
    /// 若仍返回 `Error::Decapsulation`，协议层会将其吸收。
    fn decapsulate(
        config: &CryptoConfig,
        private_key: &PrivateComponent,
        ciphertext: &[u8],
    ) -> Result<SharedSecret>;
}
