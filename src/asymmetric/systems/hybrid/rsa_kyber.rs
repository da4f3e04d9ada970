//!
//! 具体的混合协议实例：RSA-OAEP(SHA-256) 作为传统部分，Kyber 作为后量子部分。
//!

use crate::asymmetric::systems::post_quantum::kyber::KyberKem;
use crate::asymmetric::systems::traditional::rsa::RsaOaepKem;
use crate::protocol::HybridProtocol;

/// RSA-OAEP + Kyber 混合协议，RSA 的密文总是排在前面
pub type RsaKyberProtocol = HybridProtocol<RsaOaepKem, KyberKem>;
