//! 非对称部分：KEM 数据类型、核心 Trait 与具体方案实现

pub mod keys;
pub mod systems;
pub mod traits;

pub use self::keys::{
    EncapsulationResult, KeyPair, PrivateComponent, PublicComponent, SHARED_SECRET_LEN,
    SharedSecret,
};
pub use self::traits::KeyEncapsulationMechanism;
