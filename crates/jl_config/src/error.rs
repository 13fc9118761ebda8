// crates/jl_config/src/error.rs

//! 配置层错误类型

use jl_foundation::JlError;

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 解析错误
    #[error("解析错误: {0}")]
    Parse(String),

    /// 无效值
    #[error("无效值 '{key}': {value} - {reason}")]
    InvalidValue {
        /// 配置键
        key: String,
        /// 配置值
        value: String,
        /// 原因
        reason: String,
    },

    /// 缺失配置
    #[error("缺失配置: {0}")]
    Missing(String),
}

impl ConfigError {
    /// 无效值
    pub fn invalid(key: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// 转换到基础层错误
impl From<ConfigError> for JlError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(e) => JlError::Io {
                path: "<config>".into(),
                message: e.to_string(),
                source: Some(e),
            },
            other => JlError::configuration(other.to_string()),
        }
    }
}
