// crates/jl_foundation/src/lib.rs

//! Jelly Foundation Layer
//!
//! 基础层，只提供整个工作区共用的错误类型。
//!
//! # 层级架构
//!
//! ```text
//! jl_cli        ─> 命令行入口
//! jl_io         ─> Gadget-2 快照读写
//! jl_ics        ─> 采样、分区、赋值、组装、标记
//! jl_config     ─> IcConfig, Precision, ScalarBlock
//! jl_foundation ─> JlError (本层)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;

// 重导出常用类型
pub use error::{JlError, JlResult};
