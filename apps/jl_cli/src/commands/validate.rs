// apps/jl_cli/src/commands/validate.rs

//! 配置验证命令
//!
//! 校验配置并试运行采样与标记，只报告数量，不写文件。

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use jl_config::IcConfig;
use jl_ics::IcGenerator;
use tracing::info;

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: PathBuf,
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== Jelly 配置验证 ===");

    let config = IcConfig::from_file(&args.config)
        .with_context(|| format!("配置无效: {}", args.config.display()))?;
    println!("  ✓ 配置文件格式有效: {}", args.config.display());

    let generator = IcGenerator::new(&config).context("几何检查失败")?;
    let [nx, ny, nz] = generator.lattice().counts();
    println!("  格点: {nx} x {ny} x {nz}");
    let bulk = generator.bulk();
    println!("  体采样: {} ({} 个候选点)", bulk.name(), bulk.n_points());
    if let Some(collar) = generator.collar() {
        if collar.is_degenerate() {
            println!("  环带: 退化 (Nphi = 0), 忽略障碍物");
        } else {
            println!(
                "  环带: Nphi = {}, {} 环, {} 个点",
                collar.n_phi(),
                collar.n_rings(),
                collar.n_points()
            );
        }
    }

    let dataset = generator.generate().context("试运行失败")?;
    println!("  单元总数: {}", dataset.len());
    super::print_role_histogram(&dataset.role_histogram());
    println!("  输出路径: {} (未写出)", config.output_path.display());

    Ok(())
}
