// crates/jl_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `JlError` 枚举和 `JlResult` 类型别名。初始条件生成是一次性的确定性
//! 批处理，任何错误都不可恢复：检测到即中止，并报告失败的不变量。
//!
//! # 错误分类
//!
//! - [`JlError::Configuration`]: 参数非法（分辨率非正、障碍物过大、结果为空）
//! - [`JlError::Geometry`]: 几何约束违反（排除带超出计算域、障碍物越界、位置重复）
//! - [`JlError::IdentifierCollision`]: 标识符冲突（内部逻辑缺陷）
//! - [`JlError::Io`]: 输出文件写入或收尾失败
//!
//! # 示例
//!
//! ```
//! use jl_foundation::error::{JlError, JlResult};
//!
//! fn check_resolution(d: f64) -> JlResult<()> {
//!     jl_foundation::ensure!(d > 0.0, JlError::configuration("分辨率必须为正"));
//!     Ok(())
//! }
//!
//! assert!(check_resolution(0.01).is_ok());
//! assert!(check_resolution(0.0).is_err());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// 统一结果类型
pub type JlResult<T> = Result<T, JlError>;

/// Jelly 错误类型
#[derive(Error, Debug)]
pub enum JlError {
    /// 配置错误
    #[error("配置错误: {message}")]
    Configuration {
        /// 具体错误信息
        message: String,
    },

    /// 几何错误
    #[error("几何错误: {message}")]
    Geometry {
        /// 具体错误信息
        message: String,
    },

    /// 标识符冲突
    #[error("标识符冲突: {identifier} 被单元 {first} 与 {second} 重复使用")]
    IdentifierCollision {
        /// 冲突的最终标识符
        identifier: i64,
        /// 先占用该标识符的单元序号
        first: usize,
        /// 后占用该标识符的单元序号
        second: usize,
    },

    /// 标识符编号空间耗尽
    #[error("标识符冲突: {count} 个单元超出角色偏移间隔 {capacity}")]
    IdentifierRangeExhausted {
        /// 单元总数
        count: usize,
        /// 可用的基础序号容量
        capacity: usize,
    },

    /// IO 错误
    #[error("IO错误: {path}: {message}")]
    Io {
        /// 相关文件路径
        path: PathBuf,
        /// 描述性错误信息
        message: String,
        #[source]
        /// 可选的底层 IO 错误
        source: Option<std::io::Error>,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl JlError {
    /// 配置错误
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// 几何错误
    pub fn geometry(message: impl Into<String>) -> Self {
        Self::Geometry {
            message: message.into(),
        }
    }

    /// 标识符冲突
    pub fn identifier_collision(identifier: i64, first: usize, second: usize) -> Self {
        Self::IdentifierCollision {
            identifier,
            first,
            second,
        }
    }

    /// 标识符编号空间耗尽
    pub fn identifier_range_exhausted(count: usize, capacity: usize) -> Self {
        Self::IdentifierRangeExhausted { count, capacity }
    }

    /// IO 错误
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Io {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    /// IO 错误（带源）
    pub fn io_with_source(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// 错误类别名称，用于日志与命令行退出信息
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "ConfigurationError",
            Self::Geometry { .. } => "GeometryError",
            Self::IdentifierCollision { .. } | Self::IdentifierRangeExhausted { .. } => {
                "IdentifierCollisionError"
            }
            Self::Io { .. } => "IOError",
        }
    }
}

// ========================================================================
// 验证辅助方法
// ========================================================================

impl JlError {
    /// 检查值为有限正数
    #[inline]
    pub fn check_positive(field: &'static str, value: f64) -> JlResult<()> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(Self::configuration(format!("{field} 必须为有限正数, 实际 {value}")))
        }
    }
}

/// 条件不满足时返回错误
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err($err.into());
        }
    };
}

// ========================================================================
// 测试
// ========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = JlError::configuration("分辨率必须为正");
        assert!(err.to_string().contains("配置错误"));
        assert_eq!(err.kind(), "ConfigurationError");
    }

    #[test]
    fn test_collision_display() {
        let err = JlError::identifier_collision(10_000_001, 0, 5);
        let msg = err.to_string();
        assert!(msg.contains("10000001"));
        assert_eq!(err.kind(), "IdentifierCollisionError");
    }

    #[test]
    fn test_range_exhausted_kind() {
        let err = JlError::identifier_range_exhausted(10_000_000, 9_999_999);
        assert_eq!(err.kind(), "IdentifierCollisionError");
    }

    #[test]
    fn test_io_error_keeps_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = JlError::io_with_source("/tmp/ics.dat", io_err);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("/tmp/ics.dat"));
    }

    #[test]
    fn test_check_positive() {
        assert!(JlError::check_positive("resolution", 0.1).is_ok());
        assert!(JlError::check_positive("resolution", 0.0).is_err());
        assert!(JlError::check_positive("resolution", -1.0).is_err());
        assert!(JlError::check_positive("resolution", f64::NAN).is_err());
    }

    #[test]
    fn test_ensure_macro() {
        fn check(value: i32) -> JlResult<()> {
            ensure!(value > 0, JlError::geometry("value must be positive"));
            Ok(())
        }

        assert!(check(1).is_ok());
        assert!(matches!(check(-1), Err(JlError::Geometry { .. })));
    }
}
