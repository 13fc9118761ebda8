// crates/jl_config/src/precision.rs

//! 输出浮点精度
//!
//! 位置、速度与标量块在快照中的浮点宽度。下游程序默认读取单精度，
//! 以双精度输入编译时需选择 `F64`。标识符块始终为 32 位整数。

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 快照浮点精度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// 单精度浮点 (f32)
    #[default]
    F32,
    /// 双精度浮点 (f64)
    F64,
}

impl Precision {
    /// 获取精度名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    /// 每个标量占用的字节数
    pub fn size_bytes(&self) -> usize {
        match self {
            Self::F32 => 4,
            Self::F64 => 8,
        }
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 精度解析错误
#[derive(Debug, Clone)]
pub struct PrecisionParseError(String);

impl FromStr for Precision {
    type Err = PrecisionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "f32" | "float" | "single" | "float32" => Ok(Self::F32),
            "f64" | "double" | "float64" => Ok(Self::F64),
            _ => Err(PrecisionParseError(s.to_string())),
        }
    }
}

impl std::fmt::Display for PrecisionParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "无效的精度值: '{}', 期望 'f32' 或 'f64'", self.0)
    }
}

impl std::error::Error for PrecisionParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_default_is_single() {
        assert_eq!(Precision::default(), Precision::F32);
    }

    #[test]
    fn test_precision_parse() {
        assert_eq!("f32".parse::<Precision>().unwrap(), Precision::F32);
        assert_eq!("F64".parse::<Precision>().unwrap(), Precision::F64);
        assert_eq!("double".parse::<Precision>().unwrap(), Precision::F64);
        assert!("half".parse::<Precision>().is_err());
    }

    #[test]
    fn test_precision_serde_lowercase() {
        let json = serde_json::to_string(&Precision::F64).unwrap();
        assert_eq!(json, "\"f64\"");
    }
}
