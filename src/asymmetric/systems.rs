//! 算法系统集合
//!
//! 包含传统、后量子KEM实现以及二者组成的混合协议实例
#[cfg(all(feature = "traditional", feature = "post-quantum"))]
pub mod hybrid;
#[cfg(feature = "post-quantum")]
pub mod post_quantum;
#[cfg(feature = "traditional")]
pub mod traditional;
