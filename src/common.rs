//! 通用模块，包含配置、错误处理和工具函数

pub mod config;
pub mod errors;
pub mod utils;

pub use self::config::CryptoConfig;
pub use self::errors::{Error, ErrorKind, Result};
pub use self::utils::{ZeroizingVec, constant_time_eq, from_base64, to_base64};
