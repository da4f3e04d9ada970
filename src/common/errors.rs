use thiserror::Error;

/// 协议操作可能遇到的错误类型
///
/// 密钥生成与封装阶段的错误会立即返回给调用方；解封装错误只在内部出现，
/// 由协议层吸收（隐式拒绝），不会从 `responder_decapsulate` 传出。
#[derive(Error, Debug)]
pub enum Error {
    #[error("Key generation failed: {0}")]
    KeyGen(String),

    #[error("Encapsulation failed: {0}")]
    Encapsulation(String),

    #[error("Decapsulation failed: {0}")]
    Decapsulation(String),

    #[error("Invalid input length: expected {expected} bytes, got {actual}")]
    InvalidInputLength { expected: usize, actual: usize },

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Invalid session state: {0}")]
    InvalidState(String),

    #[error("Invalid data format: {0}")]
    Format(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("Serialization error (JSON)")]
    Json(#[from] serde_json::Error),
}

/// 调用方可见的粗粒度失败类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 任一方案的密钥生成失败，会话在产生任何密钥前中止
    KeyGeneration,
    /// 任一方案的封装失败，不会退化为单KEM模式
    Encapsulation,
    /// 输入长度、格式或配置错误，不含任何秘密相关信息
    InvalidInput,
    /// 其余内部错误
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::KeyGen(_) => ErrorKind::KeyGeneration,
            Error::Encapsulation(_) => ErrorKind::Encapsulation,
            Error::InvalidInputLength { .. }
            | Error::Format(_)
            | Error::Configuration(_)
            | Error::InvalidState(_) => ErrorKind::InvalidInput,
            Error::Decapsulation(_) | Error::KeyDerivation(_) | Error::Io(_) | Error::Json(_) => {
                ErrorKind::Internal
            }
        }
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::Format(format!("Base64解码错误: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
