// apps/jl_cli/src/commands/defaults.rs

//! 打印默认配置

use anyhow::{Context, Result};
use jl_config::IcConfig;

/// 执行默认配置命令
pub fn execute() -> Result<()> {
    let json = serde_json::to_string_pretty(&IcConfig::default())
        .context("无法序列化默认配置")?;
    println!("{json}");
    Ok(())
}
