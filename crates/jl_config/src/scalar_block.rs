// crates/jl_config/src/scalar_block.rs

//! 标识符块之后的标量块
//!
//! 下游程序按编译选项决定读取哪些标量块以及顺序，因此这里只给出可配置的
//! 有序列表。默认顺序为密度、比内能：质量表为零时第一个标量块占据质量块的
//! 位置，由下游按密度解释。

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 标量块名称
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarBlock {
    /// 密度
    Density,
    /// 比内能
    InternalEnergy,
}

impl ScalarBlock {
    /// 块名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Density => "density",
            Self::InternalEnergy => "internal_energy",
        }
    }

    /// 默认块顺序
    pub fn default_order() -> Vec<ScalarBlock> {
        vec![Self::Density, Self::InternalEnergy]
    }
}

impl std::fmt::Display for ScalarBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScalarBlock {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "density" | "rho" => Ok(Self::Density),
            "internal_energy" | "energy" | "u" => Ok(Self::InternalEnergy),
            other => Err(format!("未知标量块: '{other}'")),
        }
    }
}
