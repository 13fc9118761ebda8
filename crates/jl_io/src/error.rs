// crates/jl_io/src/error.rs

//! IO 层错误类型
//!
//! 快照读写的所有错误最终转换为 [`JlError::Io`]。

use std::path::PathBuf;

use jl_foundation::JlError;
use thiserror::Error;

/// IO 层结果类型
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// 快照读写错误
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// 文件系统错误
    #[error("文件操作失败: {path}: {source}")]
    Io {
        /// 相关文件路径
        path: PathBuf,
        /// 底层错误
        #[source]
        source: std::io::Error,
    },

    /// 数据格式错误
    #[error("快照格式错误: {0}")]
    Format(String),

    /// F77 记录首尾长度标记不一致
    #[error("记录标记不一致: 首部 {leading}, 尾部 {trailing}")]
    RecordMismatch {
        /// 首部长度标记
        leading: i32,
        /// 尾部长度标记
        trailing: i32,
    },
}

impl SnapshotError {
    /// 文件系统错误
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// 格式错误
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }
}

impl From<SnapshotError> for JlError {
    fn from(err: SnapshotError) -> Self {
        match err {
            SnapshotError::Io { path, source } => JlError::io_with_source(path, source),
            other => JlError::io("<snapshot>", other.to_string()),
        }
    }
}
