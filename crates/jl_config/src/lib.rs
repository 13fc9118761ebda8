// crates/jl_config/src/lib.rs

//! Jelly Config Layer
//!
//! 配置层，描述一次初始条件生成所需的全部输入：计算域、分辨率、体采样方式、障碍物、
//! 流动区域预设、边界层、扰动、快照精度与标量块顺序。
//!
//! # 模块概览
//!
//! - [`ic_config`]: IcConfig 及其子配置
//! - [`precision`]: Precision 枚举（F32/F64）
//! - [`scalar_block`]: 标量块名称与默认顺序
//! - [`error`]: 配置错误类型

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod ic_config;
pub mod precision;
pub mod scalar_block;

// 重导出核心类型
pub use error::ConfigError;
pub use ic_config::{
    Axis, EdgeLayerConfig, FlowPreset, HeaderConfig, IcConfig, JitterConfig, ObstacleConfig,
    RegionPresets, SamplingConfig,
};
pub use precision::Precision;
pub use scalar_block::ScalarBlock;
